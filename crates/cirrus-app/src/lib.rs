//! Cirrus editor application: window shell, frame pipeline, scene state and UI.

pub mod app;
pub mod frame_clock;
pub mod orchestrator;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod stats;
pub mod ui;
