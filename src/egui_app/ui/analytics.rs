use super::style;
use super::{EguiApp, charts, notice};
use crate::egui_app::state::ReportState;
use eframe::egui::{self, RichText};

impl EguiApp {
    pub(super) fn render_analytics(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("User Feedback Analytics").size(24.0).strong());
        ui.add_space(8.0);

        let has_plan = self.controller.session().has_plan();
        let mut refresh = false;
        ui.horizontal(|ui| {
            let filter = &mut self.controller.ui.analytics.current_subject_only;
            let response = ui.add_enabled(
                has_plan,
                egui::Checkbox::new(filter, "Current subject only"),
            );
            refresh |= response.changed();
            refresh |= ui.button("Refresh").clicked();
        });
        if refresh || matches!(self.controller.ui.analytics.report, ReportState::NotLoaded) {
            self.controller.refresh_analytics();
        }
        ui.add_space(8.0);

        match &self.controller.ui.analytics.report {
            ReportState::NotLoaded => {}
            ReportState::Empty(message) => notice(ui, message, palette.text_muted),
            ReportState::Failed(message) => notice(ui, message, palette.error),
            ReportState::FormatError(err) => {
                notice(ui, "feedback.csv format is incorrect.", palette.error);
                ui.label(format!("Expected columns: {}", err.expected.join(", ")));
                ui.label(format!("Found columns: {}", err.found.join(", ")));
            }
            ReportState::Ready(summary) => {
                ui.label(RichText::new("Raw Feedback Data").strong());
                egui::ScrollArea::vertical()
                    .id_salt("feedback_rows")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        egui::Grid::new("feedback_table")
                            .striped(true)
                            .num_columns(3)
                            .spacing([24.0, 4.0])
                            .show(ui, |ui| {
                                for header in ["Exam", "Rating", "Feedback"] {
                                    ui.label(RichText::new(header).strong());
                                }
                                ui.end_row();
                                for row in &summary.rows {
                                    ui.label(&row.exam);
                                    ui.label(
                                        row.rating
                                            .map(|rating| rating.to_string())
                                            .unwrap_or_else(|| "-".to_string()),
                                    );
                                    ui.label(&row.feedback);
                                    ui.end_row();
                                }
                            });
                    });
                ui.add_space(12.0);
                let average = summary
                    .average_rating
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "n/a".to_string());
                charts::metric(ui, "Average Rating", &average);
                ui.add_space(12.0);
                ui.label(RichText::new("Rating Distribution").strong());
                charts::bar_chart(ui, &summary.rating_counts, palette.rating_bar);
            }
        }
    }
}
