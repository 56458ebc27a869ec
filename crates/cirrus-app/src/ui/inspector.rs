//! Inspector panel: imported assets, selection and camera focus.

use crate::scene::EditorScene;

use super::UiActions;

/// Imported asset list with selection and camera focus.
pub fn show(ctx: &egui::Context, scene: &mut EditorScene, actions: &mut UiActions) {
    egui::Window::new("Inspector")
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-8.0, -8.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            if scene.assets.is_empty() {
                ui.weak("No assets imported");
                return;
            }

            let mut clicked = None;
            for (i, asset) in scene.assets.iter().enumerate() {
                let selected = scene.selected() == Some(i);
                if ui.selectable_label(selected, asset.name.as_str()).clicked() {
                    clicked = Some(i);
                }
            }
            if let Some(i) = clicked {
                scene.select(Some(i));
            }

            if let Some(asset) = scene.selected_asset() {
                ui.separator();
                let p = asset.position;
                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                ui.label(format!("Triangles: {}", asset.mesh.triangle_count()));
                if ui.button("Focus Camera").clicked() {
                    actions.focus = Some(p);
                }
            }
        });
}
