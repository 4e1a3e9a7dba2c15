//! Prompt assembly for the study plan request.

use std::collections::BTreeSet;
use std::fmt;

use super::ValidationError;

const SYSTEM_INSTRUCTION: &str = "You are an expert AI Exam Preparation Planner. \
Generate a detailed structured plan in Markdown. \
Do not add intro or conclusion outside structured content.";

/// Preferred ways of learning offered on the planner form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    ReadingWriting,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 4] = [
        Self::Visual,
        Self::Auditory,
        Self::Kinesthetic,
        Self::ReadingWriting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Visual => "Visual",
            Self::Auditory => "Auditory",
            Self::Kinesthetic => "Kinesthetic",
            Self::ReadingWriting => "Reading/Writing",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the template needs for one plan.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanRequest {
    pub exam_subject: String,
    pub duration_weeks: f64,
    pub daily_hours: f64,
    pub weaknesses: String,
    pub learning_style: BTreeSet<LearningStyle>,
    pub exam_type: String,
}

impl PlanRequest {
    /// Presence checks for the two required free-text fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields(&self.exam_subject, &self.weaknesses)
    }
}

/// Subject and weaknesses are the only mandatory planner inputs.
fn require_fields(exam_subject: &str, weaknesses: &str) -> Result<(), ValidationError> {
    if exam_subject.trim().is_empty() {
        return Err(ValidationError::MissingField("Exam / Subject Name"));
    }
    if weaknesses.trim().is_empty() {
        return Err(ValidationError::MissingField("Weaknesses"));
    }
    Ok(())
}

/// A system instruction paired with the filled user template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(request: &PlanRequest) -> PlanPrompt {
    let weeks = format!("{:.1}", request.duration_weeks);
    let user = format!(
        "Generate a detailed study plan:\n\
         \n\
         Exam: {subject}\n\
         Duration: {weeks} weeks\n\
         Daily Study Hours: {hours:.2}\n\
         Weaknesses: {weaknesses}\n\
         Learning Style: {style}\n\
         Exam Type: {exam_type}\n\
         \n\
         Structure:\n\
         1. A table of Topics split into Basic, Intermediate and Advanced levels; do not use bullet points\n\
         2. Based on the given Duration of {weeks} weeks, a detailed day-by-day plan table with AM/PM timings, also listing break timings\n\
         3. Practice Strategy\n\
         4. Revision Loop\n\
         5. Suggested Resources, preferring free online resources with links; for YouTube prefer the 3Blue1Brown channel\n\
         6. Motivation Tips\n\
         7. Backup Plan\n",
        subject = request.exam_subject.trim(),
        hours = request.daily_hours,
        weaknesses = request.weaknesses.trim(),
        style = learning_style_text(&request.learning_style),
        exam_type = exam_type_text(&request.exam_type),
    );
    PlanPrompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}

fn learning_style_text(styles: &BTreeSet<LearningStyle>) -> String {
    if styles.is_empty() {
        return "No preference".to_string();
    }
    styles
        .iter()
        .map(|style| style.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn exam_type_text(exam_type: &str) -> &str {
    let trimmed = exam_type.trim();
    if trimmed.is_empty() {
        "Not specified"
    } else {
        trimmed
    }
}
