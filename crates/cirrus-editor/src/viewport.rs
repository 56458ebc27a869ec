//! Window framebuffer size as seen by the projection.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Zero dimensions are raised to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Apply a resize. A zero dimension (minimised window) is ignored and
    /// the previous size kept. Returns whether the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            debug!(width, height, "Ignoring degenerate resize");
            return false;
        }
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_resize_keeps_previous_aspect() {
        let mut vp = Viewport::new(1280, 720);
        let before = vp.aspect();
        assert!(!vp.resize(0, 720));
        assert!(!vp.resize(1280, 0));
        assert!(!vp.resize(0, 0));
        assert_eq!(vp, Viewport::new(1280, 720));
        assert_eq!(vp.aspect(), before);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut vp = Viewport::new(1280, 720);
        assert!(vp.resize(800, 800));
        assert!((vp.aspect() - 1.0).abs() < 1e-6);
        assert!(!vp.resize(800, 800));
    }

    #[test]
    fn test_new_never_zero() {
        let vp = Viewport::new(0, 0);
        assert_eq!((vp.width(), vp.height()), (1, 1));
    }
}
