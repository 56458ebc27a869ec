use cirrus_editor::EditorMode;

use crate::stats::FrameStats;

pub fn show(ctx: &egui::Context, stats: &FrameStats, mode: EditorMode) {
    egui::Window::new("Stats")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.label(format!("{:.0} FPS", stats.fps()));
            ui.label(format!("{:.2} ms", stats.frame_ms()));
            ui.separator();
            ui.label(format!("Mode: {mode}"));
            let (w, h) = stats.march_size;
            ui.label(format!("March: {w}x{h}"));
        });
}
