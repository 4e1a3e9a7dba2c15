//! Library exports for the binary and integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// TOML-backed settings.
pub mod config;
/// Opt-in API key storage.
pub mod credentials;
/// Shared egui UI modules.
pub mod egui_app;
pub(crate) mod http_client;
/// Tracing subscriber setup.
pub mod logging;
/// Schedule, prompt, generation client and session context.
pub mod planner;
/// Feedback and progress tables.
pub mod tables;
