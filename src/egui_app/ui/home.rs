use super::EguiApp;
use super::style;
use crate::planner::Page;
use eframe::egui::{self, RichText};

impl EguiApp {
    pub(super) fn render_home(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.add_space(24.0);
        ui.label(RichText::new("Aura Learn").size(32.0).strong());
        ui.label(
            RichText::new("Your AI-powered exam preparation planner").color(palette.text_muted),
        );
        ui.add_space(16.0);
        ui.label(
            "Tell the planner about your exam, your free hours and your weak spots, \
             and get a structured day-by-day study plan. Log your daily progress and \
             watch it add up.",
        );
        ui.add_space(24.0);

        let mut target = None;
        ui.horizontal(|ui| {
            let size = egui::vec2(180.0, 36.0);
            for (label, page) in [
                ("Start Planning", Page::Planner),
                ("Progress Tracker", Page::ProgressTracker),
                ("View Analytics", Page::Analytics),
            ] {
                if ui.add_sized(size, egui::Button::new(label)).clicked() {
                    target = Some(page);
                }
                ui.add_space(8.0);
            }
        });
        if let Some(page) = target {
            self.controller.navigate(page);
        }
    }
}
