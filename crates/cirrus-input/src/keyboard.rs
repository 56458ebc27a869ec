//! Keyboard state for the editor: held keys plus one-frame press edges.
//!
//! Keys are tracked by physical code so WASD fly controls sit in the same
//! place on every layout. Edge queries back the Tab, Escape and R toggles.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Platform-independent key event, mainly for tests.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn press(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn release(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Held keys and per-frame press edges.
///
/// Feed events with [`process_event`](Self::process_event), query during the
/// update, then call [`clear_transients`](Self::clear_transients) once the
/// frame is done.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Auto-repeat and unidentified keys are dropped so edges fire once.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        let PhysicalKey::Code(code) = event.key else {
            return;
        };
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(code) {
                    self.pressed_this_frame.insert(code);
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    #[must_use]
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// True only on the frame the key went down.
    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.pressed_this_frame.contains(&code)
    }

    /// Either Alt key is down.
    #[must_use]
    pub fn alt_held(&self) -> bool {
        self.is_held(KeyCode::AltLeft) || self.is_held(KeyCode::AltRight)
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn clear_transients(&mut self) {
        self.pressed_this_frame.clear();
    }
}
