//! Cloud layer parameters and the density field sampled by both cloud
//! marchers.

use glam::Vec3;

use crate::noise::{fbm_3d, smoothstep};

/// Minimum gap kept between `coverage_min` and `coverage_max`.
pub const COVERAGE_EPSILON: f32 = 0.01;

/// Octaves of 3D fbm used for cloud shapes.
const CLOUD_OCTAVES: u32 = 5;
const CLOUD_PERSISTENCE: f32 = 0.5;

/// Advection velocity of the noise field, in noise-space units per second.
pub const WIND: Vec3 = Vec3::new(0.6, 0.0, 0.25);

/// A horizontal slab of procedural cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudLayer {
    pub base_height: f32,
    pub thickness: f32,
    pub noise_scale: f32,
    coverage_min: f32,
    coverage_max: f32,
    pub density_factor: f32,
}

impl Default for CloudLayer {
    fn default() -> Self {
        Self {
            base_height: 10.0,
            thickness: 12.0,
            noise_scale: 0.4,
            coverage_min: 0.6,
            coverage_max: 0.75,
            density_factor: 1.0,
        }
    }
}

impl CloudLayer {
    /// Build a layer, repairing an inverted or empty coverage band.
    pub fn new(
        base_height: f32,
        thickness: f32,
        noise_scale: f32,
        coverage_min: f32,
        coverage_max: f32,
        density_factor: f32,
    ) -> Self {
        let mut layer = Self {
            base_height,
            thickness,
            noise_scale,
            coverage_min,
            coverage_max,
            density_factor,
        };
        layer.enforce_coverage_band();
        layer
    }

    pub fn coverage_min(&self) -> f32 {
        self.coverage_min
    }

    pub fn coverage_max(&self) -> f32 {
        self.coverage_max
    }

    /// Set the lower coverage threshold. Pushes the upper one up if needed.
    pub fn set_coverage_min(&mut self, value: f32) {
        self.coverage_min = value;
        self.enforce_coverage_band();
    }

    /// Set the upper coverage threshold, never below `min + COVERAGE_EPSILON`.
    pub fn set_coverage_max(&mut self, value: f32) {
        self.coverage_max = value;
        self.enforce_coverage_band();
    }

    fn enforce_coverage_band(&mut self) {
        self.coverage_max = self.coverage_max.max(self.coverage_min + COVERAGE_EPSILON);
    }

    /// Height of the top of the layer.
    pub fn top(&self) -> f32 {
        self.base_height + self.thickness
    }

    /// Parametric span `[enter, exit]` where a ray is inside the layer,
    /// starting no earlier than the origin and capped at `max_distance`.
    ///
    /// `None` when the ray never enters the slab in front of its origin.
    pub fn ray_span(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, f32)> {
        let (lo, hi) = (self.base_height, self.top());

        let (enter, exit) = if direction.y.abs() < 1e-4 {
            if origin.y < lo || origin.y > hi {
                return None;
            }
            (0.0, max_distance)
        } else {
            let t0 = (lo - origin.y) / direction.y;
            let t1 = (hi - origin.y) / direction.y;
            (t0.min(t1).max(0.0), t0.max(t1).min(max_distance))
        };

        (exit > enter).then_some((enter, exit))
    }

    /// True when no sample of this layer can have positive density.
    pub fn is_empty(&self) -> bool {
        self.density_factor <= 0.0 || self.thickness <= 0.0
    }
}

/// Cloud density at `p` after `time` seconds of wind advection.
///
/// Zero outside `[base_height, base_height + thickness]`; callers treat zero
/// as "no contribution" and skip the sample.
pub fn cloud_density(layer: &CloudLayer, p: Vec3, time: f32) -> f32 {
    if layer.is_empty() || p.y < layer.base_height || p.y > layer.top() {
        return 0.0;
    }

    let h = (p.y - layer.base_height) / layer.thickness;
    let vertical = smoothstep(0.0, 0.2, h) * (1.0 - smoothstep(0.6, 1.0, h));
    if vertical <= 0.0 {
        return 0.0;
    }

    let q = p * layer.noise_scale + WIND * time;
    let shape = fbm_3d(q, CLOUD_OCTAVES, CLOUD_PERSISTENCE).normalized();
    let coverage = smoothstep(layer.coverage_min, layer.coverage_max, shape);

    vertical * coverage * layer.density_factor
}
