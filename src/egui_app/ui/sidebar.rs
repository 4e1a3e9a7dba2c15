use super::EguiApp;
use super::style;
use crate::planner::Page;
use eframe::egui::{self, Frame, Margin, RichText};

impl EguiApp {
    pub(super) fn render_sidebar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let mut navigate_to = None;
        let mut remember_changed = None;
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(240.0)
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(12, 12)),
            )
            .show(ctx, |ui| {
                ui.label(RichText::new("Aura Learn").heading().color(palette.text_primary));
                ui.label(RichText::new("AI study planner").color(palette.text_muted));
                ui.add_space(12.0);

                ui.label(RichText::new("API key").strong());
                let state = &mut self.controller.ui;
                ui.add(
                    egui::TextEdit::singleline(&mut state.api_key)
                        .password(true)
                        .hint_text("Paste your API key")
                        .desired_width(f32::INFINITY),
                );
                if state.api_key.trim().is_empty() {
                    ui.label(RichText::new("Paste your API key").color(palette.warning));
                }
                let mut remember = state.remember_api_key;
                if ui.checkbox(&mut remember, "Remember key").changed() {
                    remember_changed = Some(remember);
                }

                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("Navigate").strong());
                let current = self.controller.session().page();
                for page in Page::ALL {
                    if ui.selectable_label(current == page, page.label()).clicked() {
                        navigate_to = Some(page);
                    }
                }
            });
        if let Some(remember) = remember_changed {
            self.controller.set_remember_api_key(remember);
        }
        if let Some(page) = navigate_to {
            self.controller.navigate(page);
        }
    }
}
