#![deny(missing_docs)]

//! Entry point for the Aura Learn study planner.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use auralearn::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use auralearn::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Aura Learn");

    let viewport = egui::ViewportBuilder::default()
        .with_title("Aura Learn")
        .with_inner_size(egui::vec2(1280.0, 860.0))
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Aura Learn",
        native_options,
        Box::new(|_cc| match EguiApp::new() {
            Ok(app) => Ok(Box::new(app)),
            Err(err) => {
                tracing::error!("Startup failed: {err}");
                Ok(Box::new(LaunchError { message: err }))
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start Aura Learn");
                ui.label(&self.message);
            });
        });
    }
}
