use super::style;
use super::{EguiApp, charts, notice};
use crate::egui_app::state::ReportState;
use crate::tables::CompletionStatus;
use eframe::egui::{self, RichText};

impl EguiApp {
    pub(super) fn render_progress(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Study Progress Tracker").size(24.0).strong());
        ui.add_space(8.0);
        let Some(subject) = self.controller.session().active_subject().map(str::to_string) else {
            notice(ui, "Please generate a study plan first.", palette.warning);
            return;
        };
        ui.label(RichText::new(format!("Tracking: {subject}")).color(palette.text_muted));
        ui.add_space(12.0);

        ui.label(RichText::new("Log Today's Study Progress").size(18.0).strong());
        let mut save = false;
        let form = &mut self.controller.ui.progress;
        egui::Grid::new("progress_form")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label("Select Date");
                ui.add(
                    egui::TextEdit::singleline(&mut form.date)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(200.0),
                );
                ui.end_row();

                ui.label("Hours Studied");
                ui.add(egui::Slider::new(&mut form.hours, 0.0..=24.0).step_by(0.5));
                ui.end_row();

                ui.label("Completion Status");
                egui::ComboBox::from_id_salt("progress_status")
                    .selected_text(form.status.label())
                    .show_ui(ui, |ui| {
                        for status in CompletionStatus::ALL {
                            ui.selectable_value(&mut form.status, status, status.label());
                        }
                    });
                ui.end_row();

                ui.label("Notes (optional)");
                ui.add(
                    egui::TextEdit::multiline(&mut form.notes)
                        .desired_rows(2)
                        .desired_width(360.0),
                );
                ui.end_row();
            });
        if ui.button("Save Progress").clicked() {
            save = true;
        }
        if let Some(message) = &form.notice {
            notice(ui, message, palette.success);
        }
        if let Some(error) = &form.error {
            notice(ui, error, palette.error);
        }
        if save {
            self.controller.log_progress();
        }

        ui.add_space(16.0);
        ui.separator();
        ui.label(RichText::new("Progress Overview").size(18.0).strong());
        if matches!(self.controller.ui.progress_report, ReportState::NotLoaded) {
            self.controller.refresh_progress_report();
        }
        match &self.controller.ui.progress_report {
            ReportState::NotLoaded => {}
            ReportState::Empty(message) => notice(ui, message, palette.text_muted),
            ReportState::Failed(message) => notice(ui, message, palette.error),
            ReportState::FormatError(err) => {
                notice(ui, "progress_log.csv format is incorrect.", palette.error);
                ui.label(format!("Expected columns: {}", err.expected.join(", ")));
                ui.label(format!("Found columns: {}", err.found.join(", ")));
            }
            ReportState::Ready(summary) => {
                ui.horizontal(|ui| {
                    charts::metric(ui, "Total Days Logged", &summary.total_days.to_string());
                    ui.add_space(32.0);
                    charts::metric(
                        ui,
                        "Completion Rate",
                        &format!("{}%", summary.completion_rate),
                    );
                });
                ui.add_space(12.0);
                ui.label(RichText::new("Hours Studied Over Time").strong());
                charts::line_chart(ui, &summary.hours_by_date, palette.accent);
                ui.add_space(12.0);
                ui.label(RichText::new("Status Distribution").strong());
                charts::bar_chart(ui, &summary.status_counts, palette.success);
            }
        }
    }
}
