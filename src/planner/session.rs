//! Per-session state: the current page and the last generated plan.

use super::StudyWindow;

/// Views reachable from the sidebar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Home,
    Planner,
    ProgressTracker,
    Analytics,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Self::Home,
        Self::Planner,
        Self::ProgressTracker,
        Self::Analytics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Planner => "Planner",
            Self::ProgressTracker => "Progress Tracker",
            Self::Analytics => "Analytics",
        }
    }
}

/// Outcome of one successful generation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanResult {
    pub days_remaining: i64,
    pub duration_weeks: f64,
    pub daily_hours: f64,
    pub exam_subject: String,
    pub plan_text: String,
}

impl PlanResult {
    pub fn new(window: StudyWindow, exam_subject: impl Into<String>, plan_text: String) -> Self {
        Self {
            days_remaining: window.days_remaining,
            duration_weeks: window.duration_weeks,
            daily_hours: window.daily_hours,
            exam_subject: exam_subject.into(),
            plan_text,
        }
    }
}

/// Session-scoped context owned by the controller.
///
/// Starts on the home page with no plan. A plan is only ever replaced as a
/// whole, by the next successful generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionContext {
    page: Page,
    plan: Option<PlanResult>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }

    pub fn plan(&self) -> Option<&PlanResult> {
        self.plan.as_ref()
    }

    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    /// Subject of the active plan, used to tag feedback and progress rows.
    pub fn active_subject(&self) -> Option<&str> {
        self.plan.as_ref().map(|plan| plan.exam_subject.as_str())
    }

    pub fn store_plan(&mut self, plan: PlanResult) {
        self.plan = Some(plan);
    }
}
