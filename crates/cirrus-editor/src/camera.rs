//! Yaw/pitch editor camera.
//!
//! Angles are stored in degrees. Yaw `-90` looks down `-Z`. The projection is
//! reverse-Z (near maps to depth 1) to match the raster depth test.

use glam::{Mat4, Vec3};

use cirrus_march::CameraBlock;

pub const NEAR_PLANE: f32 = 0.1;
/// Equal to the march trace distance so raster and raymarch agree on range.
pub const FAR_PLANE: f32 = cirrus_march::MAX_TRACE_DISTANCE;
/// Vertical field of view limits, degrees.
pub const ZOOM_RANGE: (f32, f32) = (1.0, 90.0);
const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Units per second.
    pub speed: f32,
    /// Degrees per pixel.
    pub sensitivity: f32,
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 10.0),
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            speed: 2.5,
            sensitivity: 0.1,
        }
    }
}

impl EditorCamera {
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front()).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front(), self.up())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, FAR_PLANE, NEAR_PLANE)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Matrices inverted for this frame's march.
    pub fn camera_block(&self, aspect: f32, time: f32) -> CameraBlock {
        CameraBlock::new(
            self.position,
            self.view_matrix(),
            self.projection_matrix(aspect),
            time,
        )
    }

    /// Move along the camera basis. `forward`/`right` are in `-1..=1`.
    pub fn translate(&mut self, forward: f32, right: f32, dt: f32) {
        let velocity = self.speed * dt;
        self.position += self.front() * forward * velocity + self.right() * right * velocity;
    }

    /// Mouse look. `dx` right, `dy` up, in pixels.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom_by(&mut self, lines: f32) {
        self.zoom = (self.zoom - lines).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }

    /// Park the camera a little above and behind `target`, facing `-Z`.
    pub fn focus_on(&mut self, target: Vec3) {
        self.position = target + Vec3::new(0.0, 2.0, 5.0);
        self.yaw = -90.0;
        self.pitch = 0.0;
    }
}
