//! Edit/Play state machine driving the camera and cursor policy.
//!
//! The controller never touches the window. It tracks which cursor mode it
//! wants and hands the shell a [`CursorRequest`] whenever that differs from
//! what was last applied.
//!
//! Editing:
//! - RMB held (pointer not over UI): cursor captured, WASD fly, mouse look.
//! - Alt + LMB with a selected target: orbit around the target.
//! - Otherwise the cursor is free for the UI.
//!
//! Playing:
//! - Tab toggles capture. Re-capture only happens with lock-in-play on.
//! - While captured: WASD fly and mouse look.
//! - Scroll zooms, R requests a texture reload, Escape returns to Editing.

use glam::Vec3;
use tracing::{debug, info};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use cirrus_input::{CursorMode, KeyboardState, MouseState};

use crate::camera::EditorCamera;
use crate::mode::{EditorMode, ModeTransition};
use crate::orbit::Orbit;

/// What the shell should do with the OS cursor this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRequest {
    Capture,
    Release,
    Keep,
}

/// Borrowed input for one controller update.
pub struct InputFrame<'a> {
    pub keyboard: &'a KeyboardState,
    pub mouse: &'a mut MouseState,
    /// The UI is hovering or dragging and owns the pointer.
    pub ui_wants_pointer: bool,
    /// A UI text field has focus.
    pub ui_wants_keyboard: bool,
    /// Position of the selected asset, if any.
    pub orbit_target: Option<Vec3>,
    pub dt: f32,
}

/// Side effects of an update beyond camera motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerEvents {
    pub transition: Option<ModeTransition>,
    pub reload_texture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    Fly,
    Orbit,
}

#[derive(Debug)]
pub struct ModeController {
    mode: EditorMode,
    desired: CursorMode,
    applied: CursorMode,
    drag: Drag,
    pub lock_mouse_in_play: bool,
    /// Mouse up looks down.
    pub invert_y: bool,
}

impl ModeController {
    pub fn new(lock_mouse_in_play: bool) -> Self {
        Self {
            mode: EditorMode::Editing,
            desired: CursorMode::Free,
            applied: CursorMode::Free,
            drag: Drag::None,
            lock_mouse_in_play,
            invert_y: false,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The cursor mode the controller currently wants.
    pub fn cursor(&self) -> CursorMode {
        self.desired
    }

    /// Editing → Playing. Captures the cursor when lock-in-play is on and
    /// always re-arms the look guard.
    pub fn enter_play(&mut self, mouse: &mut MouseState) -> Option<ModeTransition> {
        if self.mode.is_playing() {
            return None;
        }
        self.drag = Drag::None;
        self.desired = if self.lock_mouse_in_play {
            CursorMode::Captured
        } else {
            CursorMode::Free
        };
        mouse.arm_first_sample();
        Some(self.switch(EditorMode::Playing))
    }

    /// Playing → Editing, releasing the cursor.
    pub fn exit_play(&mut self, mouse: &mut MouseState) -> Option<ModeTransition> {
        if !self.mode.is_playing() {
            return None;
        }
        self.desired = CursorMode::Free;
        mouse.arm_first_sample();
        Some(self.switch(EditorMode::Editing))
    }

    fn switch(&mut self, to: EditorMode) -> ModeTransition {
        let transition = ModeTransition {
            from: self.mode,
            to,
        };
        self.mode = to;
        info!(from = %transition.from, to = %transition.to, "Editor mode changed");
        transition
    }

    /// Cursor change to apply since the last call.
    pub fn take_cursor_request(&mut self) -> CursorRequest {
        if self.desired == self.applied {
            return CursorRequest::Keep;
        }
        self.applied = self.desired;
        match self.desired {
            CursorMode::Captured => CursorRequest::Capture,
            CursorMode::Free => CursorRequest::Release,
        }
    }

    /// Run one frame of input against the camera.
    pub fn update(&mut self, input: InputFrame<'_>, camera: &mut EditorCamera) -> ControllerEvents {
        let mut events = ControllerEvents::default();

        if self.mode.is_playing() && input.keyboard.just_pressed(KeyCode::Escape) {
            events.transition = self.exit_play(input.mouse);
            return events;
        }

        match self.mode {
            EditorMode::Editing => self.update_editing(input, camera),
            EditorMode::Playing => {
                events.reload_texture = self.update_playing(input, camera);
            }
        }
        events
    }

    fn update_editing(&mut self, input: InputFrame<'_>, camera: &mut EditorCamera) {
        let InputFrame {
            keyboard,
            mouse,
            ui_wants_pointer,
            orbit_target,
            dt,
            ..
        } = input;

        let flying = mouse.is_held(MouseButton::Right) && !ui_wants_pointer;
        let orbit_target = orbit_target
            .filter(|_| keyboard.alt_held() && mouse.is_held(MouseButton::Left) && !ui_wants_pointer);

        if flying {
            self.begin_drag(Drag::Fly, mouse);
            fly(keyboard, camera, dt);
            let (dx, dy) = self.look_delta(mouse);
            camera.look(dx, dy);
        } else if let Some(target) = orbit_target {
            self.begin_drag(Drag::Orbit, mouse);
            let (dx, dy) = self.look_delta(mouse);
            if let Some(mut orbit) = Orbit::from_eye(camera.position, target) {
                orbit.drag(dx, dy);
                orbit.apply(camera);
            }
        } else if self.drag != Drag::None {
            debug!(drag = ?self.drag, "Camera drag ended");
            self.drag = Drag::None;
            self.desired = CursorMode::Free;
            mouse.arm_first_sample();
        }
    }

    /// Mouse delta with screen-down flipped to look-up, unless inverted.
    fn look_delta(&self, mouse: &MouseState) -> (f32, f32) {
        let delta = mouse.delta();
        if self.invert_y {
            (delta.x, delta.y)
        } else {
            (delta.x, -delta.y)
        }
    }

    fn begin_drag(&mut self, drag: Drag, mouse: &mut MouseState) {
        if self.drag != drag {
            self.drag = drag;
            self.desired = CursorMode::Captured;
            mouse.arm_first_sample();
        }
    }

    /// Returns whether a texture reload was requested.
    fn update_playing(&mut self, input: InputFrame<'_>, camera: &mut EditorCamera) -> bool {
        let InputFrame {
            keyboard,
            mouse,
            ui_wants_pointer,
            ui_wants_keyboard,
            dt,
            ..
        } = input;

        if !ui_wants_keyboard && keyboard.just_pressed(KeyCode::Tab) {
            let next = self.desired.toggled();
            if !next.is_captured() || self.lock_mouse_in_play {
                self.desired = next;
                mouse.arm_first_sample();
                debug!(cursor = ?next, "Cursor toggled (Tab)");
            }
        }

        if self.desired.is_captured() {
            fly(keyboard, camera, dt);
            let (dx, dy) = self.look_delta(mouse);
            camera.look(dx, dy);
        }

        if !ui_wants_pointer && mouse.scroll() != 0.0 {
            camera.zoom_by(mouse.scroll());
        }

        !ui_wants_keyboard && keyboard.just_pressed(KeyCode::KeyR)
    }
}

fn fly(keyboard: &KeyboardState, camera: &mut EditorCamera, dt: f32) {
    let axis = |pos: KeyCode, neg: KeyCode| {
        f32::from(u8::from(keyboard.is_held(pos))) - f32::from(u8::from(keyboard.is_held(neg)))
    };
    let forward = axis(KeyCode::KeyW, KeyCode::KeyS);
    let right = axis(KeyCode::KeyD, KeyCode::KeyA);
    if forward != 0.0 || right != 0.0 {
        camera.translate(forward, right, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_input::RawKeyEvent;
    use winit::event::ElementState;

    fn frame<'a>(
        keyboard: &'a KeyboardState,
        mouse: &'a mut MouseState,
        orbit_target: Option<Vec3>,
    ) -> InputFrame<'a> {
        InputFrame {
            keyboard,
            mouse,
            ui_wants_pointer: false,
            ui_wants_keyboard: false,
            orbit_target,
            dt: 0.1,
        }
    }

    /// Mirror what the shell does with a request.
    fn apply(ctrl: &mut ModeController, mouse: &mut MouseState) -> CursorRequest {
        let req = ctrl.take_cursor_request();
        match req {
            CursorRequest::Capture => mouse.set_captured(true),
            CursorRequest::Release => mouse.set_captured(false),
            CursorRequest::Keep => {}
        }
        req
    }

    #[test]
    fn test_enter_play_captures_and_rearms_guard() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(100.0, 100.0);
        mouse.on_cursor_moved(140.0, 100.0);
        assert!(!mouse.first_sample_armed());

        let t = ctrl.enter_play(&mut mouse).unwrap();
        assert_eq!((t.from, t.to), (EditorMode::Editing, EditorMode::Playing));
        assert!(mouse.first_sample_armed());
        assert_eq!(apply(&mut ctrl, &mut mouse), CursorRequest::Capture);

        // First raw sample after capture is swallowed.
        mouse.clear_transients();
        mouse.on_raw_motion(300.0, -200.0);
        assert_eq!(mouse.delta(), glam::Vec2::ZERO);
        mouse.on_raw_motion(4.0, 0.0);
        assert_eq!(mouse.delta(), glam::Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_enter_play_without_lock_keeps_cursor_free() {
        let mut ctrl = ModeController::new(false);
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(1.0, 1.0);
        ctrl.enter_play(&mut mouse);
        assert!(mouse.first_sample_armed());
        assert_eq!(ctrl.take_cursor_request(), CursorRequest::Keep);
        assert!(ctrl.enter_play(&mut mouse).is_none());
    }

    #[test]
    fn test_escape_returns_to_editing() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        ctrl.enter_play(&mut mouse);
        apply(&mut ctrl, &mut mouse);

        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::Escape));
        let events = ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(events.transition.map(|t| t.to), Some(EditorMode::Editing));
        assert_eq!(ctrl.mode(), EditorMode::Editing);
        assert_eq!(apply(&mut ctrl, &mut mouse), CursorRequest::Release);
    }

    #[test]
    fn test_tab_toggles_capture_in_play() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        ctrl.enter_play(&mut mouse);
        apply(&mut ctrl, &mut mouse);

        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::Tab));
        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(apply(&mut ctrl, &mut mouse), CursorRequest::Release);
        assert_eq!(ctrl.mode(), EditorMode::Playing);

        kb.clear_transients();
        kb.process_raw(RawKeyEvent::release(KeyCode::Tab));
        kb.process_raw(RawKeyEvent::press(KeyCode::Tab));
        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(apply(&mut ctrl, &mut mouse), CursorRequest::Capture);
    }

    #[test]
    fn test_tab_cannot_capture_without_lock() {
        let mut ctrl = ModeController::new(false);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        ctrl.enter_play(&mut mouse);

        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::Tab));
        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(ctrl.cursor(), CursorMode::Free);
    }

    #[test]
    fn test_free_cursor_in_play_does_not_move_camera() {
        let mut ctrl = ModeController::new(false);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        ctrl.enter_play(&mut mouse);

        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyW));
        let before = cam.clone();
        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(cam, before);
    }

    #[test]
    fn test_reload_requested_on_r_in_play_only() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyR));

        assert!(!ctrl.update(frame(&kb, &mut mouse, None), &mut cam).reload_texture);
        ctrl.enter_play(&mut mouse);
        assert!(ctrl.update(frame(&kb, &mut mouse, None), &mut cam).reload_texture);
    }

    #[test]
    fn test_rmb_flies_in_editing() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyW));
        mouse.on_button(MouseButton::Right, ElementState::Pressed);

        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(apply(&mut ctrl, &mut mouse), CursorRequest::Capture);
        assert!(cam.position.z < 10.0);

        mouse.on_button(MouseButton::Right, ElementState::Released);
        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(apply(&mut ctrl, &mut mouse), CursorRequest::Release);
    }

    #[test]
    fn test_invert_y_flips_pitch() {
        for (invert, looks_up) in [(false, true), (true, false)] {
            let mut ctrl = ModeController::new(true);
            ctrl.invert_y = invert;
            let mut mouse = MouseState::new();
            let mut cam = EditorCamera::default();
            let kb = KeyboardState::new();
            ctrl.enter_play(&mut mouse);
            apply(&mut ctrl, &mut mouse);

            mouse.on_raw_motion(0.0, 0.0);
            mouse.on_raw_motion(0.0, -10.0);
            ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
            assert_eq!(cam.pitch > 0.0, looks_up, "invert_y = {invert}");
        }
    }

    #[test]
    fn test_rmb_over_ui_is_ignored() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        let kb = KeyboardState::new();
        mouse.on_button(MouseButton::Right, ElementState::Pressed);

        let mut input = frame(&kb, &mut mouse, None);
        input.ui_wants_pointer = true;
        ctrl.update(input, &mut cam);
        assert_eq!(ctrl.take_cursor_request(), CursorRequest::Keep);
    }

    #[test]
    fn test_alt_lmb_orbits_selection() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::AltLeft));
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        let target = Vec3::ZERO;
        let radius = cam.position.length();

        // First frame only arms the drag.
        ctrl.update(frame(&kb, &mut mouse, Some(target)), &mut cam);
        apply(&mut ctrl, &mut mouse);
        mouse.on_raw_motion(1.0, 1.0);
        mouse.on_raw_motion(60.0, 0.0);
        ctrl.update(frame(&kb, &mut mouse, Some(target)), &mut cam);

        assert!(((cam.position - target).length() - radius).abs() < 1e-3);
        assert!((cam.front() - (target - cam.position).normalize()).length() < 1e-3);
    }

    #[test]
    fn test_orbit_needs_selection() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::AltLeft));
        mouse.on_button(MouseButton::Left, ElementState::Pressed);

        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(ctrl.take_cursor_request(), CursorRequest::Keep);
        assert_eq!(cam, EditorCamera::default());
    }

    #[test]
    fn test_scroll_zooms_in_play() {
        let mut ctrl = ModeController::new(true);
        let mut mouse = MouseState::new();
        let mut cam = EditorCamera::default();
        let kb = KeyboardState::new();
        ctrl.enter_play(&mut mouse);
        mouse.on_scroll(winit::event::MouseScrollDelta::LineDelta(0.0, 5.0));
        ctrl.update(frame(&kb, &mut mouse, None), &mut cam);
        assert_eq!(cam.zoom, 40.0);
    }
}
