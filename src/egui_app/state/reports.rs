use crate::tables::{DataFormatError, FeedbackSummary};

/// Loaded aggregate for a chart view.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ReportState<T> {
    #[default]
    NotLoaded,
    /// Nothing to chart; carries the message to show.
    Empty(String),
    Ready(T),
    /// The table file has unexpected columns.
    FormatError(DataFormatError),
    /// The table file could not be read.
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyticsViewState {
    /// Restrict the aggregates to the active plan's subject.
    pub current_subject_only: bool,
    pub report: ReportState<FeedbackSummary>,
}
