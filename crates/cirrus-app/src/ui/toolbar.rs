use std::path::PathBuf;

use super::{EditorPanels, PanelView, UiActions};

/// Play/Stop, asset import and mouse-lock toggle.
pub fn show(
    ctx: &egui::Context,
    panels: &mut EditorPanels,
    view: &mut PanelView<'_>,
    actions: &mut UiActions,
) {
    egui::Window::new("Toolbar")
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 8.0))
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if view.mode.is_playing() { "Stop" } else { "Play" };
                if ui.button(label).clicked() {
                    actions.toggle_play = true;
                }
                ui.checkbox(&mut *view.lock_mouse_in_play, "Lock Mouse in Play");
                ui.checkbox(&mut panels.show_stats, "Stats");

                ui.separator();
                if ui.button("Reload Texture").clicked() {
                    actions.reload_texture = true;
                }
                if ui.button("Reset Physics").clicked() {
                    actions.reset_physics = true;
                }
            });

            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut panels.import_path)
                        .hint_text("path/to/model.glb or .obj")
                        .desired_width(260.0),
                );
                let path = panels.import_path.trim();
                if ui
                    .add_enabled(!path.is_empty(), egui::Button::new("Import Asset"))
                    .clicked()
                {
                    actions.import = Some(PathBuf::from(path));
                }
            });
        });
}
