use super::jobs::{PlanGenerationResult, PlanJob};
use super::*;
use crate::planner::schedule::{parse_date, parse_time};
use crate::planner::{
    PlanPrompt, PlanRequest, PlanResult, StudyWindow, ValidationError, build_prompt,
};
use time::Date;

impl EguiController {
    /// Validate the planner form and start generating a plan.
    ///
    /// Validation failures are reported inline and leave the session as is.
    pub fn submit_plan(&mut self) {
        if self.jobs.plan_in_progress() {
            return;
        }
        let (window, request) = match self.prepare_plan(today_local()) {
            Ok(prepared) => prepared,
            Err(err) => {
                let message = err.to_string();
                self.ui.planner.error = Some(message.clone());
                self.set_status(message, StatusTone::Warning);
                return;
            }
        };
        self.ui.planner.error = None;
        self.remember_api_key_if_enabled();
        let prompt: PlanPrompt = build_prompt(&request);
        let started = self.jobs.begin_plan_generation(PlanJob {
            service: Arc::clone(&self.service),
            prompt,
            api_key: self.ui.api_key.clone(),
            window,
            exam_subject: request.exam_subject.trim().to_string(),
        });
        if started {
            tracing::info!(
                days = window.days_remaining,
                weeks = window.duration_weeks,
                hours = window.daily_hours,
                "Generating study plan"
            );
            self.set_status("Generating your personalized study plan...", StatusTone::Busy);
        }
    }

    pub(super) fn prepare_plan(
        &self,
        today: Date,
    ) -> Result<(StudyWindow, PlanRequest), ValidationError> {
        let form = &self.ui.planner;
        let mut request = PlanRequest {
            exam_subject: form.exam_subject.trim().to_string(),
            duration_weeks: 0.0,
            daily_hours: 0.0,
            weaknesses: form.weaknesses.trim().to_string(),
            learning_style: form.learning_styles.clone(),
            exam_type: form.exam_type.trim().to_string(),
        };
        // Missing fields are reported before any date or time problem.
        request.validate()?;
        let exam_date = parse_date(&form.exam_date)?;
        let start = parse_time(&form.start_time)?;
        let end = parse_time(&form.end_time)?;
        let window = StudyWindow::compute(today, exam_date, start, end)?;
        request.duration_weeks = window.duration_weeks;
        request.daily_hours = window.daily_hours;
        Ok((window, request))
    }

    pub(super) fn handle_plan_generated(&mut self, message: PlanGenerationResult) {
        self.jobs.clear_plan_generation();
        match message.result {
            Ok(plan_text) => {
                let plan = PlanResult::new(message.window, message.exam_subject, plan_text);
                tracing::info!(subject = %plan.exam_subject, "Study plan stored");
                self.session.store_plan(plan);
                self.ui.feedback = FeedbackFormState::default();
                self.ui.progress.notice = None;
                self.ui.progress.error = None;
                self.ui.progress_report = ReportState::NotLoaded;
                self.ui.planner.error = None;
                self.set_status("Study plan ready", StatusTone::Info);
            }
            Err(err) => {
                tracing::warn!("Plan generation failed: {err}");
                self.ui.planner.error = Some(err.user_message());
                self.set_status(err.user_message(), StatusTone::Error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::GenerationError;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;
    use time::macros::date;

    struct CannedService(Result<String, GenerationError>);

    impl PlanService for CannedService {
        fn generate(
            &self,
            _prompt: &PlanPrompt,
            _api_key: &str,
        ) -> Result<String, GenerationError> {
            self.0.clone()
        }
    }

    fn controller(
        dir: &std::path::Path,
        result: Result<String, GenerationError>,
    ) -> EguiController {
        let mut settings = AppSettings::default();
        settings.storage.data_dir = Some(dir.to_path_buf());
        EguiController::new(settings, Arc::new(CannedService(result))).unwrap()
    }

    fn wait(controller: &mut EguiController) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.plan_in_progress() && Instant::now() < deadline {
            controller.poll_jobs();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn prepare_plan_computes_window_from_form() {
        let dir = tempdir().unwrap();
        let mut controller = controller(dir.path(), Ok(String::new()));
        controller.ui.planner.exam_subject = " Statistics ".into();
        controller.ui.planner.weaknesses = "Bayes".into();
        controller.ui.planner.exam_date = "2026-11-02".into();
        controller.ui.planner.start_time = "22:00".into();
        controller.ui.planner.end_time = "06:00".into();
        let (window, request) = controller.prepare_plan(date!(2026 - 10 - 19)).unwrap();
        assert_eq!(window.days_remaining, 14);
        assert_eq!(window.duration_weeks, 2.0);
        assert_eq!(window.daily_hours, 8.0);
        assert_eq!(request.exam_subject, "Statistics");
        assert_eq!(request.daily_hours, 8.0);
    }

    #[test]
    fn missing_fields_win_over_bad_dates() {
        let dir = tempdir().unwrap();
        let mut controller = controller(dir.path(), Ok("plan".into()));
        controller.ui.planner.exam_subject = "Statistics".into();
        controller.ui.planner.weaknesses = " ".into();
        controller.ui.planner.exam_date = "next week".into();
        let err = controller.prepare_plan(date!(2026 - 10 - 19)).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("Weaknesses"));

        controller.ui.planner.weaknesses = "Bayes".into();
        let err = controller.prepare_plan(date!(2026 - 10 - 19)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate("next week".into()));
    }

    #[test]
    fn bad_time_text_is_reported_inline() {
        let dir = tempdir().unwrap();
        let mut controller = controller(dir.path(), Ok("plan".into()));
        controller.ui.planner.exam_subject = "Statistics".into();
        controller.ui.planner.weaknesses = "Bayes".into();
        controller.ui.planner.start_time = "evening".into();
        controller.submit_plan();
        assert!(!controller.plan_in_progress());
        assert_eq!(
            controller.ui.planner.error.as_deref(),
            Some("Invalid time 'evening', expected HH:MM")
        );
        assert!(!controller.session().has_plan());
    }

    #[test]
    fn generation_failure_keeps_previous_plan() {
        let dir = tempdir().unwrap();
        let mut controller = controller(dir.path(), Ok("first plan".into()));
        controller.ui.planner.exam_subject = "Statistics".into();
        controller.ui.planner.weaknesses = "Bayes".into();
        controller.submit_plan();
        wait(&mut controller);
        assert_eq!(controller.session().plan().unwrap().plan_text, "first plan");

        controller.service = Arc::new(CannedService(Err(GenerationError::MissingCredential)));
        controller.ui.planner.exam_subject = "Chemistry".into();
        controller.submit_plan();
        wait(&mut controller);
        let plan = controller.session().plan().unwrap();
        assert_eq!(plan.plan_text, "first plan");
        assert_eq!(plan.exam_subject, "Statistics");
        assert!(
            controller
                .ui
                .planner
                .error
                .as_deref()
                .is_some_and(|msg| msg.starts_with("Credential missing"))
        );
        assert_eq!(controller.ui.status.tone, StatusTone::Error);
    }
}
