//! Height field terrain and its implicit-surface distance estimate.

use glam::{Vec2, Vec3};

use crate::noise::fbm_2d;

/// Upper bound on fbm octaves evaluated per height sample.
pub const MAX_OCTAVES: u32 = 8;

/// Persistence is kept inside the open interval `(0, 1)` so octave
/// amplitudes strictly decay.
const PERSISTENCE_RANGE: (f32, f32) = (0.01, 0.99);

/// Parameters of the procedural height field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightfieldParams {
    /// Frequency of the first (broadest) octave.
    pub base_frequency: f32,
    /// Amplitude of the first octave before normalization.
    pub base_amplitude: f32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f32,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Exponent applied to the normalized height. Values above 1 flatten
    /// valleys and sharpen peaks.
    pub flatten_power: f32,
    /// Height of a fully saturated sample in world units.
    pub final_scale: f32,
}

impl Default for HeightfieldParams {
    fn default() -> Self {
        Self {
            base_frequency: 0.2,
            base_amplitude: 1.5,
            persistence: 0.45,
            octaves: 5,
            flatten_power: 1.8,
            final_scale: 2.5,
        }
    }
}

impl HeightfieldParams {
    /// Copy with every field pulled into its usable range.
    ///
    /// Octaves are clamped to `1..=MAX_OCTAVES`, persistence into `(0, 1)`,
    /// and negative scales or exponents to zero (a flat plane).
    pub fn sanitized(self) -> Self {
        Self {
            base_frequency: self.base_frequency.max(0.0),
            base_amplitude: self.base_amplitude.max(0.0),
            persistence: self
                .persistence
                .clamp(PERSISTENCE_RANGE.0, PERSISTENCE_RANGE.1),
            octaves: self.octaves.clamp(1, MAX_OCTAVES),
            flatten_power: self.flatten_power.max(0.0),
            final_scale: self.final_scale.max(0.0),
        }
    }
}

/// Terrain height at a horizontal position, in `[0, final_scale]`.
pub fn terrain_height(params: &HeightfieldParams, xz: Vec2) -> f32 {
    let params = params.sanitized();
    let fbm = fbm_2d(
        xz,
        params.octaves,
        params.persistence,
        params.base_frequency,
        params.base_amplitude,
    );
    let shaped = fbm.normalized().powf(params.flatten_power);
    params.final_scale * shaped
}

/// Vertical distance to the height field, positive above the surface.
///
/// Not a Euclidean distance. Near steep slopes it disagrees with the true
/// distance to the surface; the terrain marcher's step floor tolerates that.
pub fn terrain_sdf(params: &HeightfieldParams, p: Vec3) -> f32 {
    p.y - terrain_height(params, Vec2::new(p.x, p.z))
}
