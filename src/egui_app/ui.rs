//! egui renderer for the application UI.

mod analytics;
mod charts;
mod home;
mod markdown;
mod planner;
mod progress;
mod sidebar;
pub mod style;

use std::time::Duration;

use crate::egui_app::controller::EguiController;
use crate::planner::Page;
use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};

/// Smallest window size the layout is designed for.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

const BUSY_REPAINT: Duration = Duration::from_millis(100);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app from persisted configuration.
    pub fn new() -> Result<Self, String> {
        let controller = EguiController::from_config()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self::with_controller(controller))
    }

    pub fn with_controller(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::chart_border(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(6.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_primary));
                });
            });
    }

    fn render_page(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                Frame::new()
                    .fill(style::palette().bg_primary)
                    .inner_margin(Margin::symmetric(24, 16)),
            )
            .show(ctx, |ui| {
                let page = self.controller.session().page();
                egui::ScrollArea::vertical()
                    .id_salt("page_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| match page {
                        Page::Home => self.render_home(ui),
                        Page::Planner => self.render_planner(ui),
                        Page::ProgressTracker => self.render_progress(ui),
                        Page::Analytics => self.render_analytics(ui),
                    });
            });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();
        if self.controller.plan_in_progress() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
        self.render_status(ctx);
        self.render_sidebar(ctx);
        self.render_page(ctx);
    }
}

/// Colored one-line message used for inline notices and errors.
fn notice(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    ui.label(RichText::new(text).color(color));
}
