use std::collections::BTreeSet;

use crate::planner::LearningStyle;
use crate::tables::CompletionStatus;

/// Planner form inputs, kept as typed text until submission.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerFormState {
    pub exam_subject: String,
    /// `YYYY-MM-DD`.
    pub exam_date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub learning_styles: BTreeSet<LearningStyle>,
    pub weaknesses: String,
    pub exam_type: String,
    /// Validation or generation error shown under the form.
    pub error: Option<String>,
}

impl Default for PlannerFormState {
    fn default() -> Self {
        Self {
            exam_subject: String::new(),
            exam_date: String::new(),
            start_time: "18:00".into(),
            end_time: "21:00".into(),
            learning_styles: BTreeSet::new(),
            weaknesses: String::new(),
            exam_type: String::new(),
            error: None,
        }
    }
}

/// Feedback form shown under a generated plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackFormState {
    pub text: String,
    /// Slider value, 1-5.
    pub rating: u8,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl Default for FeedbackFormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            rating: 1,
            notice: None,
            error: None,
        }
    }
}

/// Daily progress log form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressFormState {
    /// `YYYY-MM-DD`, defaults to today.
    pub date: String,
    /// Hours studied, 0-24 in half-hour steps.
    pub hours: f64,
    pub status: CompletionStatus,
    pub notes: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}
