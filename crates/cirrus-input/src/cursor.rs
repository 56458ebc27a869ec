//! Cursor capture policy and its application to a window.

use tracing::{debug, warn};
use winit::window::{CursorGrabMode, Window};

/// Whether the cursor is captured for camera look or free for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Hidden and grabbed; motion arrives as raw deltas.
    Captured,
    /// Visible, normal cursor for UI interaction.
    #[default]
    Free,
}

impl CursorMode {
    pub fn is_captured(self) -> bool {
        self == CursorMode::Captured
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            CursorMode::Captured => CursorMode::Free,
            CursorMode::Free => CursorMode::Captured,
        }
    }
}

/// Grab or release the cursor on `window`.
///
/// Captured tries `Locked` first and falls back to `Confined`; platforms
/// that support neither still get a hidden cursor.
pub fn apply_cursor_mode(window: &Window, mode: CursorMode) {
    match mode {
        CursorMode::Captured => {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
                && let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined)
            {
                warn!("Cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        }
        CursorMode::Free => {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                debug!("Cursor release failed: {e}");
            }
            window.set_cursor_visible(true);
        }
    }
}
