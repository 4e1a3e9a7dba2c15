//! Study plan generation: schedule arithmetic, prompt assembly, the remote
//! text-generation client and the per-session plan context.

pub mod client;
pub mod prompt;
pub mod schedule;
pub mod session;

pub use client::{ChatCompletionsClient, GenerationError, PlanService};
pub use prompt::{LearningStyle, PlanPrompt, PlanRequest, build_prompt};
pub use schedule::StudyWindow;
pub use session::{Page, PlanResult, SessionContext};

/// Form input problems reported inline without touching session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill required fields: {0}")]
    MissingField(&'static str),
    #[error("Exam date must be today or later")]
    DateInPast,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Rating must be between 1 and 5 (got {0})")]
    RatingOutOfRange(u8),
    #[error("Hours must be between 0 and 24")]
    HoursOutOfRange,
}
