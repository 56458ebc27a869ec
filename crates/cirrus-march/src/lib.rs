//! Procedural terrain and cloud raymarcher.
//!
//! Every function here is pure given a [`FrameParams`] snapshot, so pixels
//! can be traced in any order and on any thread. [`render_frame`] does the
//! whole image on the rayon pool.

pub mod cloud_march;
pub mod clouds;
pub mod compositor;
pub mod frame;
pub mod kernel;
pub mod light;
pub mod noise;
pub mod ray;
pub mod shading;
pub mod shadow;
pub mod terrain;
pub mod terrain_march;

pub use cloud_march::{CloudSample, march_clouds};
pub use clouds::{COVERAGE_EPSILON, CloudLayer, cloud_density};
pub use compositor::{composite, fog_factor, sky_color};
pub use frame::{CameraBlock, FrameParams, PixelSample, trace_pixel, trace_ray};
pub use kernel::{Framebuffer, MarchStats, march_resolution, render_frame};
pub use light::Light;
pub use noise::{Fbm, fbm_2d, fbm_3d, value_noise_2d, value_noise_3d};
pub use ray::{Ray, camera_ray, ray_direction};
pub use shadow::shadow_factor;
pub use terrain::{HeightfieldParams, MAX_OCTAVES, terrain_height, terrain_sdf};
pub use terrain_march::{MAX_TRACE_DISTANCE, TerrainHit, TerrainMarch, march_terrain};
