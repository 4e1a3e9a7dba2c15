use crate::egui_app::ui::style;
use egui::Color32;

/// Severity of the footer status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    pub tone: StatusTone,
}

impl StatusBarState {
    /// Default status shown before any plan exists.
    pub fn idle() -> Self {
        let (badge_label, badge_color) = style::status_badge(StatusTone::Idle);
        Self {
            text: "Fill in the planner to get started".into(),
            badge_label,
            badge_color,
            tone: StatusTone::Idle,
        }
    }
}
