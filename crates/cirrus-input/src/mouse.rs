//! Mouse state: look deltas, editor buttons and scroll.
//!
//! While the cursor is free, look deltas come from consecutive
//! `CursorMoved` positions. While captured they come from raw device motion.
//! Either way the first sample after [`MouseState::arm_first_sample`] only
//! establishes the origin and contributes no delta, so re-capturing the
//! cursor never snaps the camera.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels per scroll "line" for touchpad pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

fn slot(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    first_sample: bool,
    captured: bool,
    /// Left, right, middle.
    held: [bool; 3],
    scroll: f32,
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: None,
            delta: Vec2::ZERO,
            first_sample: true,
            captured: false,
            held: [false; 3],
            scroll: 0.0,
        }
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let pos = Vec2::new(x as f32, y as f32);
        let previous = self.position.replace(pos);
        if self.captured {
            return;
        }
        match previous {
            Some(prev) if !self.first_sample => self.delta += pos - prev,
            _ => self.first_sample = false,
        }
    }

    /// Raw device motion; only counted while captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if !self.captured {
            return;
        }
        if self.first_sample {
            self.first_sample = false;
            return;
        }
        self.delta += Vec2::new(dx as f32, dy as f32);
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let Some(i) = slot(button) else {
            return;
        };
        self.held[i] = state == ElementState::Pressed;
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Discard the next motion sample and any delta gathered so far.
    pub fn arm_first_sample(&mut self) {
        self.first_sample = true;
        self.delta = Vec2::ZERO;
    }

    /// Record whether the window grabbed the cursor. Switching source
    /// re-arms the first-sample guard.
    pub fn set_captured(&mut self, captured: bool) {
        if self.captured != captured {
            self.captured = captured;
            self.arm_first_sample();
        }
    }

    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Look delta in pixels since the last clear; +y is down.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn is_held(&self, button: MouseButton) -> bool {
        slot(button).is_some_and(|i| self.held[i])
    }

    /// Scroll in lines since the last clear; positive is away from the user.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[must_use]
    pub fn first_sample_armed(&self) -> bool {
        self.first_sample
    }
}
