//! Single directional light.

use glam::Vec3;
use tracing::warn;

/// Directional light. `direction` points from the scene towards the light
/// and is always unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    direction: Vec3,
    pub color: Vec3,
    pub ambient_strength: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.8, 0.7, -0.5).normalize(),
            color: Vec3::new(1.0, 0.95, 0.85),
            ambient_strength: 0.15,
        }
    }
}

impl Light {
    /// Build a light; a zero or non-finite direction falls back to the default.
    pub fn new(direction: Vec3, color: Vec3, ambient_strength: f32) -> Self {
        let mut light = Self {
            color,
            ambient_strength,
            ..Default::default()
        };
        light.set_direction(direction);
        light
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Renormalize and store a new direction.
    ///
    /// Returns `false` and keeps the previous direction when `direction`
    /// cannot be normalized.
    pub fn set_direction(&mut self, direction: Vec3) -> bool {
        match direction.try_normalize() {
            Some(unit) => {
                self.direction = unit;
                true
            }
            None => {
                warn!("Ignoring degenerate light direction {direction}");
                false
            }
        }
    }
}
