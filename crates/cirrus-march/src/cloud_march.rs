//! Volumetric integration through the cloud layer for rays that miss the
//! terrain.

use glam::Vec3;

use crate::clouds::{CloudLayer, cloud_density};
use crate::light::Light;
use crate::ray::Ray;
use crate::terrain_march::MAX_TRACE_DISTANCE;

/// Sample budget per ray.
pub const CLOUD_STEPS: u32 = 80;
/// Fixed distance between samples.
pub const CLOUD_STEP_SIZE: f32 = 0.5;
/// Accumulated alpha past which the march stops.
pub const OPAQUE_ALPHA: f32 = 0.99;
/// Scales density into per-step opacity.
pub const CLOUD_ABSORPTION: f32 = 1.0;
/// Henyey-Greenstein asymmetry. Positive values scatter forwards.
const SCATTER_G: f32 = 0.35;
/// Henyey-Greenstein value looking straight at the light.
const PHASE_PEAK: f32 = (1.0 + SCATTER_G) / ((1.0 - SCATTER_G) * (1.0 - SCATTER_G));

const CLOUD_ALBEDO: Vec3 = Vec3::new(0.95, 0.96, 1.0);
const CLOUD_AMBIENT: Vec3 = Vec3::new(0.42, 0.5, 0.62);

/// Premultiplied cloud color and coverage along one ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudSample {
    /// Premultiplied by `alpha`.
    pub color: Vec3,
    pub alpha: f32,
}

impl CloudSample {
    pub const EMPTY: Self = Self {
        color: Vec3::ZERO,
        alpha: 0.0,
    };

    /// Composite this sample over an opaque background.
    pub fn over(&self, background: Vec3) -> Vec3 {
        self.color + background * (1.0 - self.alpha)
    }
}

/// Forward-scattering phase term in `(0, 1]`, peaking when looking at the light.
///
/// `cos_theta` is the cosine between the view ray and the direction towards
/// the light.
pub fn phase(cos_theta: f32) -> f32 {
    let g2 = SCATTER_G * SCATTER_G;
    let denom = (1.0 + g2 - 2.0 * SCATTER_G * cos_theta.clamp(-1.0, 1.0)).max(1e-4);
    ((1.0 - g2) / (denom * denom.sqrt()) / PHASE_PEAK).min(1.0)
}

/// March `ray` front to back through the cloud layer.
pub fn march_clouds(layer: &CloudLayer, light: &Light, ray: &Ray, time: f32) -> CloudSample {
    if layer.is_empty() {
        return CloudSample::EMPTY;
    }
    let Some((enter, _)) = layer.ray_span(ray.origin, ray.direction, MAX_TRACE_DISTANCE) else {
        return CloudSample::EMPTY;
    };

    let scatter = phase(ray.direction.dot(light.direction()));
    let mut color = Vec3::ZERO;
    let mut alpha = 0.0_f32;
    let mut t = enter;

    for _ in 0..CLOUD_STEPS {
        if t > MAX_TRACE_DISTANCE {
            break;
        }
        let p = ray.at(t);
        // Left the slab and moving away from it.
        if (p.y < layer.base_height && ray.direction.y < 0.0)
            || (p.y > layer.top() && ray.direction.y > 0.0)
        {
            break;
        }

        let density = cloud_density(layer, p, time);
        if density > 0.0 {
            let height = ((p.y - layer.base_height) / layer.thickness).clamp(0.0, 1.0);
            // Blend from ambient towards the light colour, never brighter than either.
            let lit = scatter * (0.55 + 0.45 * height);
            let step_color = CLOUD_ALBEDO * CLOUD_AMBIENT.lerp(light.color, lit);
            let step_alpha = 1.0 - (-density * CLOUD_STEP_SIZE * CLOUD_ABSORPTION).exp();

            let weight = (1.0 - alpha) * step_alpha;
            color += step_color * weight;
            alpha += weight;

            if alpha > OPAQUE_ALPHA {
                break;
            }
        }

        t += CLOUD_STEP_SIZE;
    }

    if alpha <= 0.0 {
        return CloudSample::EMPTY;
    }
    CloudSample { color, alpha }
}
