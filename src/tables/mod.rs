//! Append-only feedback and progress tables and their chart aggregates.

pub mod recorder;
pub mod report;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use time::Date;

use crate::planner::ValidationError;
use crate::planner::schedule::format_date;

pub use recorder::append_record;
pub use report::{
    DataFormatError, FeedbackRow, FeedbackSummary, ProgressSummary, Report, ReportError,
    feedback_report, progress_report,
};

/// A row type with a fixed header.
pub trait TableRecord {
    const HEADERS: &'static [&'static str];

    /// Field values in header order.
    fn fields(&self) -> Vec<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read or write rows in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub exam: String,
    pub rating: u8,
    pub feedback: String,
}

impl FeedbackRecord {
    pub fn new(
        exam: impl Into<String>,
        rating: u8,
        feedback: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        Ok(Self {
            exam: exam.into(),
            rating,
            feedback: feedback.into(),
        })
    }
}

impl TableRecord for FeedbackRecord {
    const HEADERS: &'static [&'static str] = &["Exam", "Rating", "Feedback"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.exam.clone(),
            self.rating.to_string(),
            self.feedback.clone(),
        ]
    }
}

/// Self-reported outcome of a study day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
    #[default]
    Completed,
    PartiallyCompleted,
    Missed,
}

impl CompletionStatus {
    pub const ALL: [CompletionStatus; 3] =
        [Self::Completed, Self::PartiallyCompleted, Self::Missed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::PartiallyCompleted => "Partially Completed",
            Self::Missed => "Missed",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompletionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("Unknown status '{value}'"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressRecord {
    pub exam: String,
    pub date: Date,
    pub planned_hours: f64,
    pub completed_hours: f64,
    pub status: CompletionStatus,
    pub notes: String,
}

impl ProgressRecord {
    pub fn new(
        exam: impl Into<String>,
        date: Date,
        planned_hours: f64,
        completed_hours: f64,
        status: CompletionStatus,
        notes: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=24.0).contains(&completed_hours) {
            return Err(ValidationError::HoursOutOfRange);
        }
        Ok(Self {
            exam: exam.into(),
            date,
            planned_hours,
            completed_hours,
            status,
            notes: notes.into(),
        })
    }
}

impl TableRecord for ProgressRecord {
    const HEADERS: &'static [&'static str] = &[
        "Exam",
        "Date",
        "Planned Hours",
        "Completed Hours",
        "Status",
        "Notes",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.exam.clone(),
            format_date(self.date),
            self.planned_hours.to_string(),
            self.completed_hours.to_string(),
            self.status.label().to_string(),
            self.notes.clone(),
        ]
    }
}
