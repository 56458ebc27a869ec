//! Lattice value noise and fractal sums.
//!
//! The lattice is built once from a fixed seed, so the same coordinate
//! always produces the same value on every thread and every frame.

use std::sync::LazyLock;

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Value};

/// Seed of the shared value-noise lattice.
pub const NOISE_SEED: u32 = 0x00C1_4405;

static LATTICE: LazyLock<Value> = LazyLock::new(|| Value::new(NOISE_SEED));

/// Remap a lattice sample from `[-1, 1]` to `[0, 1]`.
#[inline]
fn unit(v: f64) -> f32 {
    (v as f32 * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// GLSL-style `smoothstep`. Returns a hard step when `edge0 >= edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 >= edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise in `[0, 1]`.
pub fn value_noise_2d(p: Vec2) -> f32 {
    unit(LATTICE.get([p.x as f64, p.y as f64]))
}

/// 3D value noise in `[0, 1]`.
pub fn value_noise_3d(p: Vec3) -> f32 {
    unit(LATTICE.get([p.x as f64, p.y as f64, p.z as f64]))
}

/// Un-normalized fractal sum together with the sum of its layer amplitudes.
///
/// Divide `raw` by `max_amplitude` (see [`Fbm::normalized`]) before shaping
/// the value further, otherwise the result scales with the octave count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fbm {
    pub raw: f32,
    pub max_amplitude: f32,
}

impl Fbm {
    /// `raw / max_amplitude` clamped to `[0, 1]`; zero when no amplitude was summed.
    pub fn normalized(self) -> f32 {
        if self.max_amplitude <= 0.0 {
            return 0.0;
        }
        (self.raw / self.max_amplitude).clamp(0.0, 1.0)
    }
}

/// Sum `octaves` layers of 2D value noise, doubling frequency and scaling
/// amplitude by `persistence` per layer.
pub fn fbm_2d(
    p: Vec2,
    octaves: u32,
    persistence: f32,
    base_frequency: f32,
    base_amplitude: f32,
) -> Fbm {
    let mut raw = 0.0;
    let mut max_amplitude = 0.0;
    let mut frequency = base_frequency;
    let mut amplitude = base_amplitude;

    for _ in 0..octaves {
        raw += value_noise_2d(p * frequency) * amplitude;
        max_amplitude += amplitude;
        frequency *= 2.0;
        amplitude *= persistence;
    }

    Fbm { raw, max_amplitude }
}

/// 3D counterpart of [`fbm_2d`] with unit base frequency and amplitude.
pub fn fbm_3d(p: Vec3, octaves: u32, persistence: f32) -> Fbm {
    let mut raw = 0.0;
    let mut max_amplitude = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;

    for _ in 0..octaves {
        raw += value_noise_3d(p * frequency) * amplitude;
        max_amplitude += amplitude;
        frequency *= 2.0;
        amplitude *= persistence;
    }

    Fbm { raw, max_amplitude }
}
