//! Lighting, terrain, cloud and camera controls.

use glam::Vec3;

use cirrus_editor::{EditorCamera, ZOOM_RANGE};
use cirrus_march::kernel::RENDER_SCALE_RANGE;
use cirrus_march::{CloudLayer, HeightfieldParams, Light, MAX_OCTAVES};

use super::PanelView;

pub fn show(ctx: &egui::Context, view: &mut PanelView<'_>) {
    egui::Window::new("Scene Controls")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            let settings = &mut view.scene.settings;

            egui::CollapsingHeader::new("Lighting")
                .default_open(true)
                .show(ui, |ui| {
                    light_controls(ui, &mut settings.light);
                    if ui.button("Reset Lighting").clicked() {
                        settings.reset_light();
                    }
                });

            egui::CollapsingHeader::new("Terrain")
                .default_open(true)
                .show(ui, |ui| {
                    terrain_controls(ui, &mut settings.terrain);
                    if ui.button("Reset Terrain").clicked() {
                        settings.reset_terrain();
                    }
                });

            egui::CollapsingHeader::new("Clouds")
                .default_open(true)
                .show(ui, |ui| {
                    cloud_controls(ui, &mut settings.clouds);
                    if ui.button("Reset Clouds").clicked() {
                        settings.reset_clouds();
                    }
                });

            egui::CollapsingHeader::new("Camera")
                .default_open(false)
                .show(ui, |ui| {
                    camera_controls(ui, view.camera);
                    ui.add(
                        egui::Slider::new(
                            &mut *view.render_scale,
                            RENDER_SCALE_RANGE.0..=RENDER_SCALE_RANGE.1,
                        )
                        .text("Render scale"),
                    );
                });
        });
}

fn light_controls(ui: &mut egui::Ui, light: &mut Light) {
    let mut dir = light.direction().to_array();
    let mut edited = false;
    ui.horizontal(|ui| {
        ui.label("Direction");
        for c in &mut dir {
            edited |= ui.add(egui::DragValue::new(c).speed(0.01)).changed();
        }
    });
    if edited {
        // Zero vectors are rejected and the previous direction kept.
        light.set_direction(Vec3::from_array(dir));
    }

    let mut color = light.color.to_array();
    ui.horizontal(|ui| {
        ui.label("Color");
        if ui.color_edit_button_rgb(&mut color).changed() {
            light.color = Vec3::from_array(color);
        }
    });
    ui.add(egui::Slider::new(&mut light.ambient_strength, 0.0..=1.0).text("Ambient"));
}

fn terrain_controls(ui: &mut egui::Ui, terrain: &mut HeightfieldParams) {
    ui.add(egui::Slider::new(&mut terrain.base_frequency, 0.01..=2.0).text("Base frequency"));
    ui.add(egui::Slider::new(&mut terrain.base_amplitude, 0.1..=10.0).text("Base amplitude"));
    ui.add(egui::Slider::new(&mut terrain.persistence, 0.1..=1.0).text("Persistence"));
    ui.add(egui::Slider::new(&mut terrain.octaves, 1..=MAX_OCTAVES).text("Octaves"));
    ui.add(egui::Slider::new(&mut terrain.flatten_power, 0.5..=5.0).text("Flatten power"));
    ui.add(egui::Slider::new(&mut terrain.final_scale, 0.1..=10.0).text("Height scale"));
}

fn cloud_controls(ui: &mut egui::Ui, clouds: &mut CloudLayer) {
    ui.add(egui::Slider::new(&mut clouds.base_height, 0.0..=50.0).text("Base height"));
    ui.add(egui::Slider::new(&mut clouds.thickness, 1.0..=50.0).text("Thickness"));
    ui.add(egui::Slider::new(&mut clouds.noise_scale, 0.01..=1.0).text("Noise scale"));

    let mut min = clouds.coverage_min();
    if ui
        .add(egui::Slider::new(&mut min, 0.0..=1.0).text("Coverage min"))
        .changed()
    {
        clouds.set_coverage_min(min);
    }
    let mut max = clouds.coverage_max();
    if ui
        .add(egui::Slider::new(&mut max, 0.0..=1.0).text("Coverage max"))
        .changed()
    {
        clouds.set_coverage_max(max);
    }

    ui.add(egui::Slider::new(&mut clouds.density_factor, 0.0..=5.0).text("Density"));
}

fn camera_controls(ui: &mut egui::Ui, camera: &mut EditorCamera) {
    let p = camera.position;
    ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
    ui.label(format!("Yaw {:.1}  Pitch {:.1}", camera.yaw, camera.pitch));
    ui.add(egui::Slider::new(&mut camera.zoom, ZOOM_RANGE.0..=ZOOM_RANGE.1).text("Zoom"));
}
