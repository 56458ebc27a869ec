//! Orbit around a target using spherical coordinates.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::camera::EditorCamera;

/// Radians per pixel of drag.
pub const ORBIT_STEP: f32 = 0.005;
/// Keeps elevation this far from the poles.
const POLE_MARGIN: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub target: Vec3,
    pub radius: f32,
    /// Angle in the XZ plane from +X toward +Z.
    pub azimuth: f32,
    pub elevation: f32,
}

impl Orbit {
    /// Spherical coordinates of `eye` around `target`. `None` when the two
    /// coincide.
    pub fn from_eye(eye: Vec3, target: Vec3) -> Option<Self> {
        let offset = eye - target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return None;
        }
        Some(Self {
            target,
            radius,
            azimuth: offset.z.atan2(offset.x),
            elevation: (offset.y / radius).clamp(-1.0, 1.0).asin(),
        })
    }

    /// Apply a drag in pixels (`dy` positive upward).
    pub fn drag(&mut self, dx: f32, dy: f32) {
        let limit = FRAC_PI_2 - POLE_MARGIN;
        self.azimuth -= dx * ORBIT_STEP;
        self.elevation = (self.elevation + dy * ORBIT_STEP).clamp(-limit, limit);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target
            + self.radius
                * Vec3::new(cos_el * self.azimuth.cos(), sin_el, cos_el * self.azimuth.sin())
    }

    /// Place `camera` on the sphere, looking at the target.
    pub fn apply(&self, camera: &mut EditorCamera) {
        camera.position = self.eye();
        camera.yaw = self.azimuth.to_degrees() + 180.0;
        camera.pitch = -self.elevation.to_degrees();
    }
}
