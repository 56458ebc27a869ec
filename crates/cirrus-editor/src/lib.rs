//! Edit/Play mode handling and the camera it drives.

pub mod camera;
pub mod controller;
pub mod mode;
pub mod orbit;
pub mod viewport;

pub use camera::{EditorCamera, FAR_PLANE, NEAR_PLANE, ZOOM_RANGE};
pub use controller::{ControllerEvents, CursorRequest, InputFrame, ModeController};
pub use mode::{EditorMode, ModeTransition};
pub use orbit::Orbit;
pub use viewport::Viewport;
