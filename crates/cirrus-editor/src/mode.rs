//! Editor modes and the transitions between them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Editing,
    Playing,
}

impl EditorMode {
    pub fn is_playing(self) -> bool {
        self == EditorMode::Playing
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::Editing => f.write_str("Editing"),
            EditorMode::Playing => f.write_str("Playing"),
        }
    }
}

/// A change of [`EditorMode`], reported so the shell can log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: EditorMode,
    pub to: EditorMode,
}
