//! egui editor panels.
//!
//! Panels read and edit the live scene store directly. Everything that
//! needs the window, the GPU or the physics world comes back as a
//! [`UiActions`] value for the shell to apply.

mod hierarchy;
mod inspector;
mod scene_controls;
mod stats;
mod toolbar;

use std::path::PathBuf;

use glam::Vec3;
use winit::event::WindowEvent;
use winit::window::Window;

use cirrus_editor::{EditorCamera, EditorMode};
use cirrus_physics::BodyProxy;

use crate::renderer::UiPaint;
use crate::scene::EditorScene;
use crate::stats::FrameStats;

/// egui context plus its winit glue.
pub struct UiState {
    pub ctx: egui::Context,
    winit: egui_winit::State,
}

impl UiState {
    pub fn new(window: &Window) -> Self {
        let ctx = egui::Context::default();
        let winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self { ctx, winit }
    }

    /// Feed a window event to egui. Returns true when egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit.on_window_event(window, event).consumed
    }

    /// egui is hovering or dragging and owns the pointer.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    /// A text field has keyboard focus.
    pub fn wants_keyboard(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Build every panel for this frame and tessellate the result.
    pub fn run(
        &mut self,
        window: &Window,
        panels: &mut EditorPanels,
        view: PanelView<'_>,
    ) -> (UiActions, UiPaint) {
        let raw = self.winit.take_egui_input(window);
        let mut actions = UiActions::default();
        let mut view = view;
        let output = self.ctx.run(raw, |ctx| {
            actions = build(ctx, panels, &mut view);
        });
        self.winit
            .handle_platform_output(window, output.platform_output);

        let paint = UiPaint {
            jobs: self.ctx.tessellate(output.shapes, output.pixels_per_point),
            textures: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        };
        (actions, paint)
    }
}

/// Panel state that lives across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorPanels {
    pub show_stats: bool,
    /// Contents of the import path field.
    pub import_path: String,
}

impl EditorPanels {
    pub fn new(show_stats: bool) -> Self {
        Self {
            show_stats,
            import_path: String::new(),
        }
    }
}

/// Borrowed editor state the panels read and edit.
pub struct PanelView<'a> {
    pub scene: &'a mut EditorScene,
    pub camera: &'a mut EditorCamera,
    pub lock_mouse_in_play: &'a mut bool,
    pub render_scale: &'a mut f32,
    pub mode: EditorMode,
    pub stats: &'a FrameStats,
    pub bodies: &'a [BodyProxy],
}

/// Requests raised by the panels this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiActions {
    pub toggle_play: bool,
    pub import: Option<PathBuf>,
    pub reload_texture: bool,
    pub reset_physics: bool,
    /// Move the camera to look at this point.
    pub focus: Option<Vec3>,
}

/// Lay out all panels. Clamps run last so the snapshot never sees an
/// out-of-range edit.
pub fn build(ctx: &egui::Context, panels: &mut EditorPanels, view: &mut PanelView<'_>) -> UiActions {
    let mut actions = UiActions::default();
    toolbar::show(ctx, panels, view, &mut actions);
    if panels.show_stats {
        stats::show(ctx, view.stats, view.mode);
    }
    scene_controls::show(ctx, view);
    inspector::show(ctx, view.scene, &mut actions);
    hierarchy::show(ctx, view.bodies);
    view.scene.settings.enforce_limits();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneSettings;

    struct Fixture {
        scene: EditorScene,
        camera: EditorCamera,
        lock: bool,
        scale: f32,
        stats: FrameStats,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scene: EditorScene::new(SceneSettings::default()),
                camera: EditorCamera::default(),
                lock: true,
                scale: 0.5,
                stats: FrameStats::new(),
            }
        }

        fn run(&mut self, panels: &mut EditorPanels, bodies: &[BodyProxy]) -> UiActions {
            let ctx = egui::Context::default();
            let mut actions = UiActions::default();
            let mut view = PanelView {
                scene: &mut self.scene,
                camera: &mut self.camera,
                lock_mouse_in_play: &mut self.lock,
                render_scale: &mut self.scale,
                mode: EditorMode::Editing,
                stats: &self.stats,
                bodies,
            };
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                actions = build(ctx, panels, &mut view);
            });
            actions
        }
    }

    #[test]
    fn test_idle_frame_raises_no_actions() {
        let mut fixture = Fixture::new();
        let mut panels = EditorPanels::new(true);
        let world = cirrus_physics::PhysicsWorld::with_demo_scene();
        let actions = fixture.run(&mut panels, &world.snapshot());

        assert_eq!(actions, UiActions::default());
        assert_eq!(fixture.scene.settings, SceneSettings::default());
        assert_eq!(fixture.camera, EditorCamera::default());
        assert!(fixture.lock);
    }

    #[test]
    fn test_build_applies_limits_to_out_of_range_edits() {
        let mut fixture = Fixture::new();
        fixture.scene.settings.terrain.persistence = 1.0;
        let mut panels = EditorPanels::new(false);
        fixture.run(&mut panels, &[]);

        assert!(fixture.scene.settings.terrain.persistence < 1.0);
    }
}
