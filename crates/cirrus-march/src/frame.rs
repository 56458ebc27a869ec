//! Per-frame parameter snapshot and the per-pixel trace.

use glam::{Mat4, Vec2, Vec3};

use crate::cloud_march::march_clouds;
use crate::clouds::CloudLayer;
use crate::compositor::{composite, sky_color};
use crate::light::Light;
use crate::ray::{Ray, camera_ray};
use crate::shading::shade_terrain;
use crate::shadow::shadow_factor;
use crate::terrain::HeightfieldParams;
use crate::terrain_march::{MAX_TRACE_DISTANCE, TerrainMarch, march_terrain};

/// Camera data handed to the marcher each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBlock {
    pub position: Vec3,
    pub inv_view: Mat4,
    pub inv_projection: Mat4,
    /// Seconds since startup. Drives cloud advection only.
    pub time: f32,
}

impl CameraBlock {
    /// Invert the camera matrices for this frame.
    pub fn new(position: Vec3, view: Mat4, projection: Mat4, time: f32) -> Self {
        Self {
            position,
            inv_view: view.inverse(),
            inv_projection: projection.inverse(),
            time,
        }
    }

    pub fn ray(&self, uv: Vec2) -> Ray {
        camera_ray(uv, self.position, self.inv_view, self.inv_projection)
    }
}

/// Immutable inputs shared by every pixel of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub camera: CameraBlock,
    pub terrain: HeightfieldParams,
    pub clouds: CloudLayer,
    pub light: Light,
}

/// Result of tracing a single pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Final composited colour.
    pub color: Vec3,
    /// Terrain hits are opaque; sky pixels carry the cloud coverage.
    pub alpha: f32,
    /// Terrain hit distance, or the maximum trace distance on a miss.
    pub distance: f32,
    pub hit_terrain: bool,
}

/// Trace the pixel at `uv` (`[0, 1]²`, origin bottom-left).
pub fn trace_pixel(params: &FrameParams, uv: Vec2) -> PixelSample {
    trace_ray(params, &params.camera.ray(uv))
}

/// Terrain march, then shading and shadow on a hit or the cloud march on a
/// miss, then fog.
pub fn trace_ray(params: &FrameParams, ray: &Ray) -> PixelSample {
    let sky = sky_color(ray.direction, &params.light);
    let time = params.camera.time;

    match march_terrain(&params.terrain, ray) {
        TerrainMarch::Hit(hit) => {
            let shadow = shadow_factor(
                &params.clouds,
                params.light.direction(),
                hit.position,
                hit.normal,
                time,
            );
            let surface = shade_terrain(
                &hit,
                ray.direction,
                &params.light,
                params.terrain.final_scale,
                shadow,
            );
            PixelSample {
                origin: ray.origin,
                direction: ray.direction,
                color: composite(surface, sky, hit.distance),
                alpha: 1.0,
                distance: hit.distance,
                hit_terrain: true,
            }
        }
        TerrainMarch::Miss { .. } => {
            let clouds = march_clouds(&params.clouds, &params.light, ray, time);
            PixelSample {
                origin: ray.origin,
                direction: ray.direction,
                color: composite(clouds.over(sky), sky, MAX_TRACE_DISTANCE),
                alpha: clouds.alpha,
                distance: MAX_TRACE_DISTANCE,
                hit_terrain: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_looking(direction: Vec3, clouds: CloudLayer) -> FrameParams {
        let position = Vec3::new(0.0, 5.0, 10.0);
        let view = Mat4::look_to_rh(position, direction, Vec3::Y);
        let projection = Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 200.0);
        FrameParams {
            camera: CameraBlock::new(position, view, projection, 0.0),
            terrain: HeightfieldParams::default(),
            clouds,
            light: Light::default(),
        }
    }

    #[test]
    fn test_miss_without_clouds_is_pure_sky() {
        let mut clouds = CloudLayer::default();
        clouds.density_factor = 0.0;
        let params = params_looking(Vec3::new(0.0, 0.3, -1.0).normalize(), clouds);

        let sample = trace_pixel(&params, Vec2::splat(0.5));
        assert!(!sample.hit_terrain);
        assert_eq!(sample.alpha, 0.0);
        assert_eq!(sample.color, sky_color(sample.direction, &params.light));
    }

    #[test]
    fn test_miss_is_fogged_at_max_trace_distance() {
        let overcast = CloudLayer::new(10.0, 12.0, 0.4, 0.0, 0.01, 5.0);
        let params = params_looking(Vec3::new(0.1, 0.8, -0.6).normalize(), overcast);
        let ray = params.camera.ray(Vec2::splat(0.5));

        let sample = trace_ray(&params, &ray);
        let sky = sky_color(ray.direction, &params.light);
        let clouds = march_clouds(&params.clouds, &params.light, &ray, 0.0);

        assert!(!sample.hit_terrain);
        assert!(sample.alpha > 0.5);
        assert_eq!(sample.distance, MAX_TRACE_DISTANCE);
        assert_eq!(sample.color, composite(clouds.over(sky), sky, MAX_TRACE_DISTANCE));
        assert!((sample.color - sky).length() < 1e-5);
    }

    #[test]
    fn test_downward_view_hits_terrain() {
        let params = params_looking(Vec3::new(0.0, -0.2, -1.0).normalize(), CloudLayer::default());
        let sample = trace_pixel(&params, Vec2::splat(0.5));
        assert!(sample.hit_terrain);
        assert_eq!(sample.alpha, 1.0);
        assert!(sample.distance < MAX_TRACE_DISTANCE);
        assert!(sample.color.is_finite());
    }

    #[test]
    fn test_trace_is_deterministic_for_frozen_params() {
        let params = params_looking(Vec3::new(0.2, 0.1, -1.0).normalize(), CloudLayer::default());
        for i in 0..10 {
            let uv = Vec2::new(i as f32 / 10.0, 0.3 + i as f32 * 0.05);
            assert_eq!(trace_pixel(&params, uv), trace_pixel(&params, uv));
        }
    }

    #[test]
    fn test_camera_block_inverts_matrices() {
        let view = Mat4::look_to_rh(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z, Vec3::Y);
        let projection = Mat4::perspective_rh(1.0, 1.0, 0.1, 200.0);
        let block = CameraBlock::new(Vec3::new(1.0, 2.0, 3.0), view, projection, 2.0);
        let identity = block.inv_view * view;
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
}
