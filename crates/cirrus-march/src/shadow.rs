//! Cloud shadows cast onto terrain by a secondary march towards the light.

use glam::Vec3;

use crate::clouds::{CloudLayer, cloud_density};

/// Density samples per shadow ray.
pub const SHADOW_STEPS: u32 = 32;
/// Start offset along the surface normal, avoids sampling at the hit point.
pub const SURFACE_OFFSET: f32 = 0.05;
/// Shadow step length as a fraction of the cloud layer thickness.
pub const SHADOW_STEP_FRACTION: f32 = 1.0 / 16.0;

/// Light transmittance in `[0, 1]` from `point` towards the light.
///
/// Takes all [`SHADOW_STEPS`] samples of `thickness / 16` each and applies
/// Beer-Lambert falloff to the summed density. The density already carries
/// the layer's density factor, so no further multiplier is applied.
pub fn shadow_factor(
    layer: &CloudLayer,
    light_direction: Vec3,
    point: Vec3,
    normal: Vec3,
    time: f32,
) -> f32 {
    if layer.is_empty() {
        return 1.0;
    }

    let origin = point + normal * SURFACE_OFFSET;
    let step = layer.thickness * SHADOW_STEP_FRACTION;
    let mut optical_depth = 0.0;
    for i in 0..SHADOW_STEPS {
        let t = (i as f32 + 0.5) * step;
        optical_depth += cloud_density(layer, origin + light_direction * t, time) * step;
    }

    (-optical_depth).exp().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overcast(density_factor: f32) -> CloudLayer {
        CloudLayer::new(10.0, 12.0, 0.4, 0.0, 0.01, density_factor)
    }

    fn sun() -> Vec3 {
        Vec3::new(0.8, 0.7, -0.5).normalize()
    }

    #[test]
    fn test_no_clouds_no_shadow() {
        let layer = overcast(0.0);
        assert_eq!(shadow_factor(&layer, sun(), Vec3::ZERO, Vec3::Y, 0.0), 1.0);
    }

    #[test]
    fn test_light_below_horizon_unshadowed_by_layer_above() {
        let layer = overcast(1.0);
        let light = Vec3::new(1.0, -0.2, 0.0).normalize();
        assert_eq!(shadow_factor(&layer, light, Vec3::ZERO, Vec3::Y, 0.0), 1.0);
    }

    #[test]
    fn test_overcast_sky_attenuates() {
        let layer = overcast(1.0);
        let s = shadow_factor(&layer, sun(), Vec3::ZERO, Vec3::Y, 0.0);
        assert!(s < 0.5, "shadow {s}");
        assert!(s >= 0.0);
    }

    #[test]
    fn test_vertical_column_matches_beer_lambert_sum() {
        let layer = CloudLayer::new(2.0, 8.0, 0.4, 0.2, 0.7, 1.5);
        let step = 8.0 / 16.0;
        let optical_depth: f32 = (0..SHADOW_STEPS)
            .map(|i| {
                let y = SURFACE_OFFSET + (i as f32 + 0.5) * step;
                cloud_density(&layer, Vec3::new(3.0, y, -2.0), 0.0) * step
            })
            .sum();
        assert!(optical_depth > 0.0);

        let s = shadow_factor(&layer, Vec3::Y, Vec3::new(3.0, 0.0, -2.0), Vec3::Y, 0.0);
        assert!((s - (-optical_depth).exp()).abs() < 1e-5, "shadow {s}");
    }

    #[test]
    fn test_layer_beyond_shadow_reach_casts_nothing() {
        // 32 steps of thickness / 16 cover twice the thickness from the surface.
        let layer = CloudLayer::new(30.0, 12.0, 0.4, 0.0, 0.01, 5.0);
        assert_eq!(shadow_factor(&layer, Vec3::Y, Vec3::ZERO, Vec3::Y, 0.0), 1.0);
    }

    #[test]
    fn test_shadow_monotonic_in_density_factor() {
        let points = [
            Vec3::ZERO,
            Vec3::new(12.0, 1.0, -4.0),
            Vec3::new(-7.5, 0.3, 20.0),
        ];
        for point in points {
            let mut previous = 1.0;
            for factor in [0.0, 0.1, 0.5, 1.0, 2.0, 5.0] {
                let mut layer = CloudLayer::default();
                layer.density_factor = factor;
                let s = shadow_factor(&layer, sun(), point, Vec3::Y, 1.5);
                assert!(s <= previous + 1e-6, "factor {factor}: {s} > {previous}");
                assert!((0.0..=1.0).contains(&s));
                previous = s;
            }
        }
    }
}
