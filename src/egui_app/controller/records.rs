use super::*;
use crate::planner::schedule::parse_date;
use crate::tables::{
    FeedbackRecord, ProgressRecord, Report, ReportError, append_record, feedback_report,
    progress_report,
};

const NO_PLAN: &str = "Please generate a study plan first.";

impl EguiController {
    /// Append the feedback form to the feedback table, tagged with the active subject.
    pub fn submit_feedback(&mut self) {
        self.ui.feedback.notice = None;
        self.ui.feedback.error = None;
        let Some(subject) = self.session.active_subject().map(str::to_string) else {
            self.ui.feedback.error = Some(NO_PLAN.to_string());
            return;
        };
        let record = match FeedbackRecord::new(
            subject,
            self.ui.feedback.rating,
            self.ui.feedback.text.trim(),
        ) {
            Ok(record) => record,
            Err(err) => {
                self.ui.feedback.error = Some(err.to_string());
                return;
            }
        };
        if let Err(err) = append_record(&self.feedback_path, &record) {
            tracing::error!("Failed to save feedback: {err}");
            self.ui.feedback.error = Some(err.to_string());
            self.set_status(format!("Failed to save feedback: {err}"), StatusTone::Error);
            return;
        }
        tracing::info!(rating = record.rating, "Feedback saved");
        self.ui.feedback.text.clear();
        self.ui.feedback.notice = Some("Thank you for your feedback!".to_string());
        self.set_status("Feedback saved", StatusTone::Info);
    }

    /// Append today's progress entry for the active plan and refresh the overview.
    pub fn log_progress(&mut self) {
        self.ui.progress.notice = None;
        self.ui.progress.error = None;
        let Some(plan) = self.session.plan() else {
            self.ui.progress.error = Some(NO_PLAN.to_string());
            return;
        };
        let form = &self.ui.progress;
        let record = parse_date(&form.date).and_then(|date| {
            ProgressRecord::new(
                plan.exam_subject.clone(),
                date,
                plan.daily_hours,
                form.hours,
                form.status,
                form.notes.trim(),
            )
        });
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                self.ui.progress.error = Some(err.to_string());
                return;
            }
        };
        if let Err(err) = append_record(&self.progress_path, &record) {
            tracing::error!("Failed to save progress: {err}");
            self.ui.progress.error = Some(err.to_string());
            self.set_status(format!("Failed to save progress: {err}"), StatusTone::Error);
            return;
        }
        tracing::info!(status = %record.status, hours = record.completed_hours, "Progress saved");
        self.ui.progress.notes.clear();
        self.ui.progress.notice = Some("Progress saved successfully!".to_string());
        self.set_status("Progress saved", StatusTone::Info);
        self.refresh_progress_report();
    }

    /// Reload the progress overview for the active plan's subject.
    pub fn refresh_progress_report(&mut self) {
        let Some(subject) = self.session.active_subject().map(str::to_string) else {
            self.ui.progress_report = ReportState::NotLoaded;
            return;
        };
        let file_exists = self.progress_path.exists();
        self.ui.progress_report = match progress_report(&self.progress_path, Some(&subject)) {
            Ok(Report::Data(summary)) => ReportState::Ready(summary),
            Ok(Report::NoData) if file_exists => {
                ReportState::Empty("No progress logged yet.".to_string())
            }
            Ok(Report::NoData) => ReportState::Empty("No progress data available yet.".to_string()),
            Err(err) => self.report_failure("progress", err),
        };
    }

    /// Reload the feedback analytics, optionally limited to the active subject.
    pub fn refresh_analytics(&mut self) {
        let subject = if self.ui.analytics.current_subject_only {
            self.session.active_subject().map(str::to_string)
        } else {
            None
        };
        self.ui.analytics.report = match feedback_report(&self.feedback_path, subject.as_deref()) {
            Ok(Report::Data(summary)) => ReportState::Ready(summary),
            Ok(Report::NoData) => ReportState::Empty("No feedback available yet.".to_string()),
            Err(err) => self.report_failure("feedback", err),
        };
    }

    fn report_failure<T>(&mut self, table: &str, err: ReportError) -> ReportState<T> {
        tracing::warn!("Failed to load {table} report: {err}");
        self.set_status(format!("Failed to load {table} data: {err}"), StatusTone::Warning);
        match err {
            ReportError::Format(format) => ReportState::FormatError(format),
            ReportError::Table(err) => ReportState::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{PlanResult, StudyWindow};
    use crate::tables::CompletionStatus;
    use tempfile::tempdir;

    struct Unused;

    impl PlanService for Unused {
        fn generate(
            &self,
            _prompt: &crate::planner::PlanPrompt,
            _api_key: &str,
        ) -> Result<String, crate::planner::GenerationError> {
            Err(crate::planner::GenerationError::Transport("offline".into()))
        }
    }

    fn controller_with_plan(dir: &std::path::Path) -> EguiController {
        let mut settings = AppSettings::default();
        settings.storage.data_dir = Some(dir.to_path_buf());
        let mut controller = EguiController::new(settings, Arc::new(Unused)).unwrap();
        controller.session.store_plan(PlanResult::new(
            StudyWindow {
                days_remaining: 10,
                duration_weeks: 1.4,
                daily_hours: 3.0,
            },
            "Geometry",
            "plan".to_string(),
        ));
        controller
    }

    #[test]
    fn progress_requires_a_plan() {
        let dir = tempdir().unwrap();
        let mut settings = AppSettings::default();
        settings.storage.data_dir = Some(dir.path().to_path_buf());
        let mut controller = EguiController::new(settings, Arc::new(Unused)).unwrap();
        controller.log_progress();
        assert_eq!(controller.ui.progress.error.as_deref(), Some(NO_PLAN));
        assert!(!controller.progress_path().exists());
    }

    #[test]
    fn logging_progress_uses_plan_hours_and_refreshes() {
        let dir = tempdir().unwrap();
        let mut controller = controller_with_plan(dir.path());
        controller.refresh_progress_report();
        assert_eq!(
            controller.ui.progress_report,
            ReportState::Empty("No progress data available yet.".to_string())
        );

        controller.ui.progress.date = "2026-10-19".into();
        controller.ui.progress.hours = 2.5;
        controller.ui.progress.status = CompletionStatus::PartiallyCompleted;
        controller.ui.progress.notes = "chapter 3".into();
        controller.log_progress();

        let text = std::fs::read_to_string(controller.progress_path()).unwrap();
        assert!(text.contains("Geometry,2026-10-19,3,2.5,Partially Completed,chapter 3"));
        let ReportState::Ready(summary) = &controller.ui.progress_report else {
            panic!("expected a ready report");
        };
        assert_eq!(summary.total_days, 1);
        assert_eq!(summary.completion_rate, 0.0);
        assert!(controller.ui.progress.notes.is_empty());
    }

    #[test]
    fn other_subjects_show_no_progress_logged() {
        let dir = tempdir().unwrap();
        let mut controller = controller_with_plan(dir.path());
        std::fs::write(
            controller.progress_path(),
            "Exam,Date,Planned Hours,Completed Hours,Status,Notes\n\
             Algebra,2026-10-19,3,3,Completed,\n",
        )
        .unwrap();
        controller.refresh_progress_report();
        assert_eq!(
            controller.ui.progress_report,
            ReportState::Empty("No progress logged yet.".to_string())
        );
    }

    #[test]
    fn feedback_is_tagged_with_subject() {
        let dir = tempdir().unwrap();
        let mut controller = controller_with_plan(dir.path());
        controller.ui.feedback.rating = 4;
        controller.ui.feedback.text = "clear, useful".into();
        controller.submit_feedback();
        assert_eq!(
            controller.ui.feedback.notice.as_deref(),
            Some("Thank you for your feedback!")
        );
        let text = std::fs::read_to_string(controller.feedback_path()).unwrap();
        assert_eq!(text, "Exam,Rating,Feedback\nGeometry,4,\"clear, useful\"\n");

        controller.refresh_analytics();
        let ReportState::Ready(summary) = &controller.ui.analytics.report else {
            panic!("expected a ready report");
        };
        assert_eq!(summary.average_rating, Some(4.0));
    }

    #[test]
    fn malformed_feedback_table_is_a_format_error() {
        let dir = tempdir().unwrap();
        let mut controller = controller_with_plan(dir.path());
        std::fs::write(controller.feedback_path(), "Name,Score\nx,1\n").unwrap();
        controller.refresh_analytics();
        assert!(matches!(
            controller.ui.analytics.report,
            ReportState::FormatError(_)
        ));
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
    }
}
