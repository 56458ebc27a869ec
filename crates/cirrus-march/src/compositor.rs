//! Sky colour and distance fog.

use glam::Vec3;

use crate::light::Light;
use crate::noise::smoothstep;
use crate::terrain_march::MAX_TRACE_DISTANCE;

pub const SKY_HORIZON: Vec3 = Vec3::new(0.75, 0.85, 0.95);
pub const SKY_ZENITH: Vec3 = Vec3::new(0.35, 0.55, 0.85);

/// Fog starts here.
pub const FOG_NEAR: f32 = 40.0;
/// Fully fogged at the far end of the terrain trace.
pub const FOG_FAR: f32 = MAX_TRACE_DISTANCE;

/// Background colour seen along `direction`, including the sun glow.
pub fn sky_color(direction: Vec3, light: &Light) -> Vec3 {
    let elevation = direction.y.max(0.0);
    let gradient = SKY_HORIZON.lerp(SKY_ZENITH, elevation);

    let sun = direction.dot(light.direction()).max(0.0);
    let glow = sun.powf(8.0) * 0.12 + sun.powf(512.0) * 0.8;

    gradient + light.color * glow
}

/// Fog amount in `[0, 1]` for a trace distance.
pub fn fog_factor(distance: f32) -> f32 {
    smoothstep(FOG_NEAR, FOG_FAR, distance)
}

/// Blend a surface or cloud colour towards the sky by distance fog.
pub fn composite(color: Vec3, sky: Vec3, trace_distance: f32) -> Vec3 {
    color.lerp(sky, fog_factor(trace_distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fog_ramp() {
        assert_eq!(fog_factor(0.0), 0.0);
        assert_eq!(fog_factor(FOG_NEAR), 0.0);
        assert_eq!(fog_factor(MAX_TRACE_DISTANCE), 1.0);
        let mid = fog_factor((FOG_NEAR + FOG_FAR) * 0.5);
        assert!((mid - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_far_geometry_becomes_sky() {
        let sky = Vec3::new(0.7, 0.8, 0.9);
        let result = composite(Vec3::new(0.1, 0.5, 0.1), sky, MAX_TRACE_DISTANCE);
        assert!((result - sky).length() < 1e-6);
    }

    #[test]
    fn test_near_geometry_keeps_colour() {
        let surface = Vec3::new(0.1, 0.5, 0.1);
        assert_eq!(composite(surface, Vec3::ONE, 5.0), surface);
    }

    #[test]
    fn test_sky_brighter_towards_sun() {
        let light = Light::default();
        let towards = sky_color(light.direction(), &light);
        let away = sky_color(-light.direction(), &light);
        assert!(towards.length() > away.length());
    }

    #[test]
    fn test_gradient_is_linear_in_elevation() {
        // Light below the horizon so no glow reaches upward rays.
        let light = Light::new(Vec3::NEG_Y, Vec3::ONE, 0.1);
        let zenith = sky_color(Vec3::Y, &light);
        assert!((zenith - SKY_ZENITH).length() < 1e-6);
        let halfway = sky_color(Vec3::new(0.0, 0.5, 0.75f32.sqrt()), &light);
        assert!((halfway - SKY_HORIZON.lerp(SKY_ZENITH, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_below_horizon_uses_horizon_colour() {
        let light = Light::new(Vec3::Y, Vec3::ONE, 0.1);
        assert_eq!(sky_color(Vec3::NEG_Y, &light), SKY_HORIZON);
    }
}
