//! Presents the CPU raymarch result: the framebuffer is uploaded to a texture
//! and stretched over the viewport with a fullscreen triangle.

use cirrus_march::Framebuffer;

use crate::texture::{GpuTexture, TextureBindings, TextureError};

/// Fullscreen-triangle blit. Texture row 0 lands at the top of the screen.
pub const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(src_texture, src_sampler, in.uv).rgb, 1.0);
}
"#;

pub struct RaymarchPass {
    pipeline: wgpu::RenderPipeline,
    target: Option<GpuTexture>,
}

impl RaymarchPass {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        bindings: &TextureBindings,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("raymarch-blit-pipeline-layout"),
            bind_group_layouts: &[&bindings.layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("raymarch-blit-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            target: None,
        }
    }

    /// Size of the texture currently holding the raymarch image.
    pub fn target_size(&self) -> Option<(u32, u32)> {
        self.target.as_ref().map(|t| t.dimensions)
    }

    /// Upload this frame's image, recreating the texture when the size changed.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bindings: &TextureBindings,
        frame: &Framebuffer,
    ) -> Result<(), TextureError> {
        let size = (frame.width(), frame.height());
        match &self.target {
            Some(target) if target.dimensions == size => target.write(queue, frame.pixels()),
            _ => {
                log::debug!("Raymarch target resized to {}x{}", size.0, size.1);
                self.target = Some(GpuTexture::from_rgba(
                    device,
                    queue,
                    bindings,
                    "raymarch-target",
                    frame.pixels(),
                    size.0,
                    size.1,
                )?);
                Ok(())
            }
        }
    }

    /// Draw the uploaded image. Does nothing before the first upload.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(target) = &self.target else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &target.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}
