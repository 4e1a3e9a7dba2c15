//! Shared state types for the egui UI.

mod forms;
mod reports;
mod status;

pub use forms::*;
pub use reports::*;
pub use status::*;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    /// API key typed into the sidebar; never logged.
    pub api_key: String,
    /// Mirrors `[ui] remember_api_key`.
    pub remember_api_key: bool,
    pub planner: PlannerFormState,
    pub feedback: FeedbackFormState,
    pub progress: ProgressFormState,
    pub progress_report: ReportState<crate::tables::ProgressSummary>,
    pub analytics: AnalyticsViewState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            api_key: String::new(),
            remember_api_key: false,
            planner: PlannerFormState::default(),
            feedback: FeedbackFormState::default(),
            progress: ProgressFormState::default(),
            progress_report: ReportState::default(),
            analytics: AnalyticsViewState::default(),
        }
    }
}
