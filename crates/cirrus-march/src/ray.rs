//! Camera ray reconstruction.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A world-space ray with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// World-space view direction through a screen position.
///
/// `uv` is in `[0, 1]²` with the origin at the bottom-left corner. The point
/// on the near plane is unprojected, moved to world space and the camera
/// position subtracted, so any invertible perspective projection works.
pub fn ray_direction(uv: Vec2, camera_position: Vec3, inv_view: Mat4, inv_projection: Mat4) -> Vec3 {
    let ndc = uv * 2.0 - Vec2::ONE;
    let clip = Vec4::new(ndc.x, ndc.y, 0.0, 1.0);

    let view = inv_projection * clip;
    let view = view / view.w;
    let world = inv_view * Vec4::new(view.x, view.y, view.z, 1.0);

    (world.truncate() - camera_position).normalize_or_zero()
}

/// Primary ray through `uv` starting at the camera.
pub fn camera_ray(uv: Vec2, camera_position: Vec3, inv_view: Mat4, inv_projection: Mat4) -> Ray {
    Ray {
        origin: camera_position,
        direction: ray_direction(uv, camera_position, inv_view, inv_projection),
    }
}
