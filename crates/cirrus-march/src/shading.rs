//! Terrain surface colour and lighting.

use glam::{Vec2, Vec3};

use crate::light::Light;
use crate::noise::{smoothstep, value_noise_2d};
use crate::terrain_march::TerrainHit;

const GRASS: Vec3 = Vec3::new(0.28, 0.45, 0.18);
const DIRT: Vec3 = Vec3::new(0.42, 0.33, 0.22);
const ROCK: Vec3 = Vec3::new(0.45, 0.42, 0.40);
const SNOW: Vec3 = Vec3::new(0.95, 0.96, 0.98);

/// Frequency of the small-scale colour breakup mask.
const PATCH_FREQUENCY: f32 = 1.7;
const SPECULAR_POWER: f32 = 32.0;
const SPECULAR_STRENGTH: f32 = 0.15;

/// Base colour from altitude, slope and a patch-noise mask.
///
/// `final_scale` is the height field's maximum height; altitude is measured
/// relative to it.
pub fn surface_albedo(position: Vec3, normal: Vec3, final_scale: f32) -> Vec3 {
    let altitude = if final_scale > 0.0 {
        (position.y / final_scale).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let slope = (1.0 - normal.y).clamp(0.0, 1.0);

    let mut color = GRASS.lerp(DIRT, smoothstep(0.25, 0.45, altitude));
    color = color.lerp(ROCK, smoothstep(0.3, 0.6, slope));

    let snow = smoothstep(0.75, 0.9, altitude) * (1.0 - smoothstep(0.3, 0.5, slope));
    color = color.lerp(SNOW, snow);

    // Dirt patches only on gentle, low ground.
    let patch = value_noise_2d(Vec2::new(position.x, position.z) * PATCH_FREQUENCY);
    let mask = smoothstep(0.55, 0.75, patch)
        * (1.0 - smoothstep(0.2, 0.4, slope))
        * (1.0 - smoothstep(0.6, 0.8, altitude));
    color.lerp(DIRT * 0.85, mask * 0.5)
}

/// Lit terrain colour at a hit.
///
/// `shadow` is the cloud transmittance towards the light and scales the
/// direct terms only; the ambient term is gated by sky visibility
/// (`normal.y`).
pub fn shade_terrain(
    hit: &TerrainHit,
    view_direction: Vec3,
    light: &Light,
    final_scale: f32,
    shadow: f32,
) -> Vec3 {
    let albedo = surface_albedo(hit.position, hit.normal, final_scale);
    let l = light.direction();
    let n = hit.normal;

    let sky_occlusion = 0.5 + 0.5 * n.y;
    let ambient = light.color * (light.ambient_strength * sky_occlusion);

    let diffuse = light.color * n.dot(l).max(0.0);

    let half = (l - view_direction).normalize_or_zero();
    let specular = n.dot(half).max(0.0).powf(SPECULAR_POWER) * SPECULAR_STRENGTH;

    albedo * (ambient + diffuse * shadow) + light.color * (specular * shadow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(position: Vec3, normal: Vec3) -> TerrainHit {
        TerrainHit {
            distance: 10.0,
            position,
            normal,
            steps: 3,
        }
    }

    #[test]
    fn test_albedo_components_in_unit_range() {
        for i in 0..200 {
            let t = i as f32 * 0.05;
            let normal = Vec3::new(t.sin(), 0.5 + 0.5 * t.cos(), 0.2).normalize();
            let c = surface_albedo(Vec3::new(t * 3.0, t * 0.25, -t), normal, 2.5);
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_steep_slopes_are_rock() {
        let steep = surface_albedo(Vec3::new(0.3, 0.5, 0.3), Vec3::X, 2.5);
        assert!((steep - ROCK).length() < 0.05, "steep {steep}");
    }

    #[test]
    fn test_high_flat_ground_is_snow() {
        let peak = surface_albedo(Vec3::new(0.3, 2.5, 0.3), Vec3::Y, 2.5);
        assert!((peak - SNOW).length() < 1e-3, "peak {peak}");
    }

    #[test]
    fn test_shadow_darkens_surface() {
        let hit = hit_at(Vec3::new(1.0, 0.2, 1.0), Vec3::Y);
        let light = Light::default();
        let view = Vec3::new(0.0, -0.5, -1.0).normalize();
        let lit = shade_terrain(&hit, view, &light, 2.5, 1.0);
        let shadowed = shade_terrain(&hit, view, &light, 2.5, 0.0);
        assert!(shadowed.length() < lit.length());
        // Ambient survives full shadow.
        assert!(shadowed.length() > 0.0);
    }

    #[test]
    fn test_zero_scale_does_not_divide_by_zero() {
        let c = surface_albedo(Vec3::new(1.0, 0.0, 1.0), Vec3::Y, 0.0);
        assert!(c.is_finite());
    }
}
