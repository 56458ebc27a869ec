//! Data-parallel CPU rendering of a whole frame.

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use tracing::trace_span;

use crate::frame::{FrameParams, trace_pixel};

const BYTES_PER_PIXEL: usize = 4;

/// Smallest and largest accepted render scale.
pub const RENDER_SCALE_RANGE: (f32, f32) = (0.1, 1.0);

/// RGBA8 pixel buffer the marcher renders into, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Allocate a buffer; zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocate for a new size. Returns `false` when nothing changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return false;
        }
        *self = Self::new(width, height);
        true
    }
}

/// Per-frame counters gathered while marching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarchStats {
    pub pixels: u32,
    pub terrain_hits: u32,
}

/// Raymarch resolution for a viewport at `scale`.
pub fn march_resolution(viewport_width: u32, viewport_height: u32, scale: f32) -> (u32, u32) {
    let scale = if scale.is_finite() {
        scale.clamp(RENDER_SCALE_RANGE.0, RENDER_SCALE_RANGE.1)
    } else {
        RENDER_SCALE_RANGE.1
    };
    let w = ((viewport_width as f32 * scale).round() as u32).max(1);
    let h = ((viewport_height as f32 * scale).round() as u32).max(1);
    (w, h)
}

#[inline]
fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Pack a colour as opaque RGBA8. No transfer function is applied.
pub fn encode_color(color: Vec3) -> [u8; 4] {
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// March every pixel of `target` in parallel, one rayon task per row.
pub fn render_frame(params: &FrameParams, target: &mut Framebuffer) -> MarchStats {
    let (width, height) = (target.width, target.height);
    let _span = trace_span!("march_frame", width, height).entered();

    let row_bytes = width as usize * BYTES_PER_PIXEL;
    let inv = Vec2::new(1.0 / width as f32, 1.0 / height as f32);

    let terrain_hits: u32 = target
        .pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .map(|(row, bytes)| {
            // Row 0 is the top of the image; uv.y grows upwards.
            let v = 1.0 - (row as f32 + 0.5) * inv.y;
            let mut hits = 0;
            for (x, px) in bytes.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let uv = Vec2::new((x as f32 + 0.5) * inv.x, v);
                let sample = trace_pixel(params, uv);
                hits += u32::from(sample.hit_terrain);
                px.copy_from_slice(&encode_color(sample.color));
            }
            hits
        })
        .sum();

    MarchStats {
        pixels: width * height,
        terrain_hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clouds::CloudLayer;
    use crate::frame::CameraBlock;
    use crate::light::Light;
    use crate::terrain::HeightfieldParams;
    use glam::Mat4;

    fn horizon_params() -> FrameParams {
        let position = Vec3::new(0.0, 5.0, 10.0);
        let view = Mat4::look_to_rh(position, Vec3::NEG_Z, Vec3::Y);
        let projection = Mat4::perspective_rh(45f32.to_radians(), 2.0, 0.1, 200.0);
        FrameParams {
            camera: CameraBlock::new(position, view, projection, 0.0),
            terrain: HeightfieldParams::default(),
            clouds: CloudLayer::default(),
            light: Light::default(),
        }
    }

    #[test]
    fn test_resolution_scaling() {
        assert_eq!(march_resolution(1280, 720, 0.5), (640, 360));
        assert_eq!(march_resolution(1280, 720, 5.0), (1280, 720));
        assert_eq!(march_resolution(1280, 720, 0.0), (128, 72));
        assert_eq!(march_resolution(1, 1, 0.1), (1, 1));
        assert_eq!(march_resolution(800, 600, f32::NAN), (800, 600));
    }

    #[test]
    fn test_framebuffer_resize() {
        let mut fb = Framebuffer::new(0, 0);
        assert_eq!((fb.width(), fb.height()), (1, 1));
        assert!(fb.resize(4, 2));
        assert_eq!(fb.pixels().len(), 4 * 2 * 4);
        assert!(!fb.resize(4, 2));
    }

    #[test]
    fn test_encode_clamps() {
        assert_eq!(encode_color(Vec3::new(-1.0, 0.5, 2.0)), [0, 128, 255, 255]);
    }

    #[test]
    fn test_render_is_deterministic_and_opaque() {
        let params = horizon_params();
        let mut a = Framebuffer::new(32, 16);
        let mut b = Framebuffer::new(32, 16);
        let stats_a = render_frame(&params, &mut a);
        let stats_b = render_frame(&params, &mut b);

        assert_eq!(a, b);
        assert_eq!(stats_a, stats_b);
        assert_eq!(stats_a.pixels, 32 * 16);
        assert!(a.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_level_camera_sees_ground_below_and_sky_above() {
        let params = horizon_params();
        let mut fb = Framebuffer::new(24, 12);
        let stats = render_frame(&params, &mut fb);
        assert!(stats.terrain_hits > 0);
        assert!(stats.terrain_hits < stats.pixels);

        // The bottom row looks down towards the ground, the top row at the sky.
        let bottom = trace_pixel(&params, Vec2::new(0.5, 0.5 / 12.0));
        let top = trace_pixel(&params, Vec2::new(0.5, 1.0 - 0.5 / 12.0));
        assert!(bottom.hit_terrain);
        assert!(!top.hit_terrain);
        let last_row = &fb.pixels()[11 * 24 * 4..];
        assert!(last_row.chunks_exact(4).all(|px| px[3] == 255));
    }
}
