//! Frame-coherent keyboard and mouse state fed from winit events.

pub mod cursor;
pub mod keyboard;
pub mod mouse;

pub use cursor::CursorMode;
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
