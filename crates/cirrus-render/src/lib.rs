//! wgpu rendering: surface management, render passes, the raymarch blit and
//! the rasterized proxy pipeline.

pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod proxy_pipeline;
pub mod raymarch_pass;
pub mod shader;
pub mod texture;

#[cfg(test)]
pub(crate) mod test_support;

pub use buffer::{MeshBuffer, vertex_layout};
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    select_present_mode,
};
pub use pass::{ColorLoad, FrameEncoder, RenderPassBuilder, SKY_BLUE};
pub use proxy_pipeline::{PROXY_SHADER_SOURCE, ProxyDraw, ProxyPipeline, ProxyUniform};
pub use raymarch_pass::{BLIT_SHADER_SOURCE, RaymarchPass};
pub use shader::{ShaderError, ShaderLibrary};
pub use texture::{GpuTexture, TextureBindings, TextureError, validate_rgba};
