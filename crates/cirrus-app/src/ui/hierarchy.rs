use cirrus_physics::BodyProxy;

/// One line per physics body, in collider order.
pub fn show(ctx: &egui::Context, bodies: &[BodyProxy]) {
    egui::Window::new("Hierarchy")
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            if bodies.is_empty() {
                ui.weak("No bodies");
            }
            for (i, body) in bodies.iter().enumerate() {
                ui.label(body.label(i));
            }
        });
}
