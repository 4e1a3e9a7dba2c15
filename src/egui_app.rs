//! egui desktop front end: UI state, the controller and the renderer.

pub mod controller;
pub mod state;
pub mod ui;
