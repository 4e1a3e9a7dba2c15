//! Controller bridging the planner and table modules to the egui UI.

mod api_key;
mod jobs;
mod planner;
mod records;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{self, AppSettings, ConfigError};
use crate::credentials::ApiKeyStore;
use crate::egui_app::state::*;
use crate::egui_app::ui::style;
use crate::planner::schedule::{format_date, today_local};
use crate::planner::{ChatCompletionsClient, Page, PlanService, SessionContext};

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    session: SessionContext,
    settings: AppSettings,
    service: Arc<dyn PlanService>,
    key_store: Option<ApiKeyStore>,
    jobs: jobs::ControllerJobs,
    feedback_path: PathBuf,
    progress_path: PathBuf,
}

impl EguiController {
    /// Build a controller around explicit settings and a plan service.
    pub fn new(settings: AppSettings, service: Arc<dyn PlanService>) -> Result<Self, ConfigError> {
        let feedback_path = settings.storage.feedback_path()?;
        let progress_path = settings.storage.progress_path()?;
        let mut ui = UiState::default();
        ui.planner.start_time = settings.planner.default_start.clone();
        ui.planner.end_time = settings.planner.default_end.clone();
        let today = format_date(today_local());
        ui.planner.exam_date = today.clone();
        ui.progress.date = today;
        ui.remember_api_key = settings.ui.remember_api_key;
        Ok(Self {
            ui,
            session: SessionContext::new(),
            settings,
            service,
            key_store: None,
            jobs: jobs::ControllerJobs::new(),
            feedback_path,
            progress_path,
        })
    }

    /// Load `config.toml`, wire the hosted service client and restore a
    /// remembered API key.
    pub fn from_config() -> Result<Self, ConfigError> {
        let settings = config::load_or_default()?;
        let service = Arc::new(ChatCompletionsClient::new(&settings.service));
        let mut controller = Self::new(settings, service)?;
        match ApiKeyStore::new() {
            Ok(store) => controller.attach_key_store(store),
            Err(err) => tracing::warn!("Credential store unavailable: {err}"),
        }
        tracing::info!(
            feedback = %controller.feedback_path.display(),
            progress = %controller.progress_path.display(),
            "Controller ready"
        );
        Ok(controller)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn feedback_path(&self) -> &std::path::Path {
        &self.feedback_path
    }

    pub fn progress_path(&self) -> &std::path::Path {
        &self.progress_path
    }

    /// Switch views, refreshing the aggregates a chart view shows.
    pub fn navigate(&mut self, page: Page) {
        if self.session.page() != page {
            tracing::debug!(page = page.label(), "Navigate");
        }
        self.session.navigate(page);
        match page {
            Page::ProgressTracker => self.refresh_progress_report(),
            Page::Analytics => self.refresh_analytics(),
            Page::Home | Page::Planner => {}
        }
    }

    /// Drain finished background work; call once per frame.
    pub fn poll_jobs(&mut self) {
        while let Some(message) = self.jobs.try_recv_message() {
            match message {
                jobs::JobMessage::PlanGenerated(result) => self.handle_plan_generated(result),
            }
        }
    }

    pub fn plan_in_progress(&self) -> bool {
        self.jobs.plan_in_progress()
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label;
        self.ui.status.badge_color = color;
        self.ui.status.tone = tone;
    }
}
