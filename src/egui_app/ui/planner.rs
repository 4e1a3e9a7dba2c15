use super::style;
use super::{EguiApp, markdown, notice};
use crate::planner::LearningStyle;
use eframe::egui::{self, RichText};

const FIELD_WIDTH: f32 = 360.0;

impl EguiApp {
    pub(super) fn render_planner(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("AI Exam Preparation Planner").size(24.0).strong());
        ui.add_space(12.0);

        let busy = self.controller.plan_in_progress();
        let mut generate = false;
        let form = &mut self.controller.ui.planner;
        egui::Grid::new("planner_form")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label("Exam / Subject Name");
                ui.add(
                    egui::TextEdit::singleline(&mut form.exam_subject).desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("Exam Date");
                ui.add(
                    egui::TextEdit::singleline(&mut form.exam_date)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("Start Time");
                ui.add(
                    egui::TextEdit::singleline(&mut form.start_time)
                        .hint_text("HH:MM")
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("End Time");
                ui.add(
                    egui::TextEdit::singleline(&mut form.end_time)
                        .hint_text("HH:MM")
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("Learning Style");
                ui.horizontal_wrapped(|ui| {
                    for learning_style in LearningStyle::ALL {
                        let mut selected = form.learning_styles.contains(&learning_style);
                        if ui.checkbox(&mut selected, learning_style.label()).changed() {
                            if selected {
                                form.learning_styles.insert(learning_style);
                            } else {
                                form.learning_styles.remove(&learning_style);
                            }
                        }
                    }
                });
                ui.end_row();

                ui.label("Weaknesses");
                ui.add(
                    egui::TextEdit::multiline(&mut form.weaknesses)
                        .hint_text("Topics you find hard")
                        .desired_rows(3)
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("Exam Type");
                ui.add(
                    egui::TextEdit::singleline(&mut form.exam_type)
                        .hint_text("e.g. MCQ, written, oral")
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!busy, egui::Button::new("Generate Study Plan"))
                .clicked()
            {
                generate = true;
            }
            if busy {
                ui.spinner();
                ui.label(
                    RichText::new("Generating your personalized study plan...")
                        .color(palette.text_muted),
                );
            }
        });
        if let Some(error) = &self.controller.ui.planner.error {
            notice(ui, error, palette.error);
        }
        if generate {
            self.controller.submit_plan();
        }

        self.render_plan_result(ui);
    }

    fn render_plan_result(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let Some(plan) = self.controller.session().plan() else {
            return;
        };
        ui.add_space(16.0);
        ui.separator();
        notice(
            ui,
            &format!("{} days remaining", plan.days_remaining),
            palette.success,
        );
        notice(
            ui,
            &format!("{} hours per day available", plan.daily_hours),
            palette.accent,
        );
        ui.add_space(8.0);
        ui.label(RichText::new("Your Study Plan").size(20.0).strong());
        ui.add_space(4.0);
        markdown::render(ui, &plan.plan_text);

        ui.add_space(16.0);
        ui.separator();
        self.render_feedback_form(ui);
    }

    fn render_feedback_form(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Give Your Feedback").size(18.0).strong());
        let form = &mut self.controller.ui.feedback;
        ui.add(
            egui::TextEdit::multiline(&mut form.text)
                .hint_text("Your Feedback")
                .desired_rows(3)
                .desired_width(FIELD_WIDTH * 1.5),
        );
        ui.add(egui::Slider::new(&mut form.rating, 1..=5).text("Rating (1-5)"));
        let submit = ui.button("Submit Feedback").clicked();
        if let Some(message) = &form.notice {
            notice(ui, message, palette.success);
        }
        if let Some(error) = &form.error {
            notice(ui, error, palette.error);
        }
        if submit {
            self.controller.submit_feedback();
        }
    }
}
