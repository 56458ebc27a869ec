//! Sphere-marching against the height field.

use glam::Vec3;

use crate::ray::Ray;
use crate::terrain::{HeightfieldParams, terrain_sdf};

/// Step budget for a single primary ray.
pub const MAX_STEPS: u32 = 100;
/// Distance below which a sample counts as on the surface.
pub const HIT_EPSILON: f32 = 0.01;
/// Rays that travel further than this without a hit miss.
pub const MAX_TRACE_DISTANCE: f32 = 200.0;
/// Offset of the central differences used for normals.
pub const NORMAL_OFFSET: f32 = 0.01;

/// A surface intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainHit {
    /// Distance along the ray.
    pub distance: f32,
    pub position: Vec3,
    /// Unit surface normal.
    pub normal: Vec3,
    /// Steps taken before the hit.
    pub steps: u32,
}

/// Outcome of a terrain march. A miss is a normal result, not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerrainMarch {
    Hit(TerrainHit),
    Miss {
        /// Distance reached when the march gave up.
        distance: f32,
    },
}

impl TerrainMarch {
    pub fn is_hit(&self) -> bool {
        matches!(self, TerrainMarch::Hit(_))
    }

    /// Hit distance, or [`MAX_TRACE_DISTANCE`] for a miss.
    pub fn trace_distance(&self) -> f32 {
        match self {
            TerrainMarch::Hit(hit) => hit.distance,
            TerrainMarch::Miss { .. } => MAX_TRACE_DISTANCE,
        }
    }
}

/// March `ray` into the height field.
///
/// Each step advances by the field value but never less than half of
/// [`HIT_EPSILON`], so near-zero samples above the surface cannot stall
/// the loop.
pub fn march_terrain(params: &HeightfieldParams, ray: &Ray) -> TerrainMarch {
    let mut t = 0.0;

    for step in 0..MAX_STEPS {
        let p = ray.at(t);
        let d = terrain_sdf(params, p);

        if d < HIT_EPSILON {
            return TerrainMarch::Hit(TerrainHit {
                distance: t,
                position: p,
                normal: terrain_normal(params, p),
                steps: step,
            });
        }

        t += d.max(HIT_EPSILON * 0.5);
        if t > MAX_TRACE_DISTANCE {
            return TerrainMarch::Miss { distance: t };
        }
    }

    TerrainMarch::Miss { distance: t }
}

/// Central-difference gradient of the height field distance, normalized.
pub fn terrain_normal(params: &HeightfieldParams, p: Vec3) -> Vec3 {
    let e = NORMAL_OFFSET;
    let dx = terrain_sdf(params, p + Vec3::X * e) - terrain_sdf(params, p - Vec3::X * e);
    let dy = terrain_sdf(params, p + Vec3::Y * e) - terrain_sdf(params, p - Vec3::Y * e);
    let dz = terrain_sdf(params, p + Vec3::Z * e) - terrain_sdf(params, p - Vec3::Z * e);
    Vec3::new(dx, dy, dz).try_normalize().unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::terrain_height;
    use glam::Vec2;

    fn down_from(origin: Vec3) -> Ray {
        Ray {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn test_straight_down_hits_at_height() {
        let params = HeightfieldParams {
            flatten_power: 1.8,
            final_scale: 2.5,
            ..Default::default()
        };
        let result = march_terrain(&params, &down_from(Vec3::new(0.0, 50.0, 0.0)));
        let TerrainMarch::Hit(hit) = result else {
            panic!("expected a hit, got {result:?}");
        };
        let expected = 50.0 - terrain_height(&params, Vec2::ZERO);
        assert!((hit.distance - expected).abs() < HIT_EPSILON);
        assert!(hit.normal.y > 0.99, "normal {}", hit.normal);
        assert!(hit.normal.x.abs() < 0.1 && hit.normal.z.abs() < 0.1);
    }

    #[test]
    fn test_march_is_deterministic() {
        let params = HeightfieldParams::default();
        let ray = Ray {
            origin: Vec3::new(0.0, 5.0, 10.0),
            direction: Vec3::new(0.0, -0.2, -1.0).normalize(),
        };
        let a = march_terrain(&params, &ray);
        let b = march_terrain(&params, &ray);
        assert_eq!(a, b);
        assert!(a.is_hit());
    }

    #[test]
    fn test_ray_above_horizon_misses() {
        let params = HeightfieldParams::default();
        let ray = Ray {
            origin: Vec3::new(0.0, 5.0, 10.0),
            direction: Vec3::new(0.0, 0.3, -1.0).normalize(),
        };
        let result = march_terrain(&params, &ray);
        assert!(!result.is_hit());
        assert_eq!(result.trace_distance(), MAX_TRACE_DISTANCE);
    }

    #[test]
    fn test_origin_below_surface_hits_immediately() {
        let params = HeightfieldParams::default();
        let ray = Ray {
            origin: Vec3::new(3.0, -1.0, 3.0),
            direction: Vec3::X,
        };
        let TerrainMarch::Hit(hit) = march_terrain(&params, &ray) else {
            panic!("expected an immediate hit");
        };
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.steps, 0);
    }

    #[test]
    fn test_grazing_ray_exhausts_budget_without_panicking() {
        // Parallel to a flat plane just above the hit band: every step is
        // tiny, so the budget runs out long before max distance.
        let params = HeightfieldParams {
            base_amplitude: 0.0,
            ..Default::default()
        };
        let ray = Ray {
            origin: Vec3::new(0.0, HIT_EPSILON * 1.5, 0.0),
            direction: Vec3::X,
        };
        match march_terrain(&params, &ray) {
            TerrainMarch::Miss { distance } => assert!(distance < MAX_TRACE_DISTANCE),
            hit => panic!("unexpected {hit:?}"),
        }
    }

    #[test]
    fn test_normal_of_flat_plane_is_up() {
        let params = HeightfieldParams {
            base_amplitude: 0.0,
            ..Default::default()
        };
        assert_eq!(terrain_normal(&params, Vec3::new(5.0, 0.0, 5.0)), Vec3::Y);
    }
}
