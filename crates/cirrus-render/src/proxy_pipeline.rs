//! Rasterized pass for physics proxies and imported meshes.
//!
//! Every draw gets its own slot in one uniform buffer, addressed with a
//! dynamic offset. Group 1 holds the albedo texture; `flags.x` blends between
//! vertex color and `texture * vertex color`.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::buffer::{MeshBuffer, vertex_layout};
use crate::depth::DepthBuffer;
use crate::texture::{GpuTexture, TextureBindings};

/// Distance between uniform slots. Matches the default `min_uniform_buffer_offset_alignment`.
pub const UNIFORM_STRIDE: u64 = 256;

const INITIAL_SLOTS: u64 = 16;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ProxyUniform {
    pub mvp: [[f32; 4]; 4],
    /// x: texture blend (0 or 1). yzw unused.
    pub flags: [f32; 4],
}

/// One object to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProxyDraw {
    pub model: Mat4,
    pub textured: bool,
}

impl ProxyDraw {
    fn uniform(&self, view_proj: Mat4) -> ProxyUniform {
        ProxyUniform {
            mvp: (view_proj * self.model).to_cols_array_2d(),
            flags: [if self.textured { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// Byte offset of uniform slot `slot`.
pub fn uniform_offset(slot: u32) -> u32 {
    (slot as u64 * UNIFORM_STRIDE) as u32
}

pub const PROXY_SHADER_SOURCE: &str = r#"
struct ProxyUniform {
    mvp: mat4x4<f32>,
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> proxy: ProxyUniform;

@group(1) @binding(0) var albedo: texture_2d<f32>;
@group(1) @binding(1) var albedo_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = proxy.mvp * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(albedo, albedo_sampler, in.uv).rgb;
    let rgb = mix(in.color, texel * in.color, proxy.flags.x);
    return vec4<f32>(rgb, 1.0);
}
"#;

pub struct ProxyPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    capacity: u64,
    prepared: u32,
}

impl ProxyPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        textures: &TextureBindings,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("proxy-uniform-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ProxyUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("proxy-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout, &textures.layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("proxy-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Imported meshes have arbitrary winding.
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state()),
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

        let (uniform_buffer, uniform_bind_group) =
            create_uniforms(device, &uniform_layout, INITIAL_SLOTS);

        Self {
            pipeline,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            capacity: INITIAL_SLOTS,
            prepared: 0,
        }
    }

    /// Number of slots written by the last [`prepare`](Self::prepare).
    pub fn prepared(&self) -> u32 {
        self.prepared
    }

    /// Write one uniform slot per draw, growing the buffer when needed.
    /// Slot `i` belongs to `draws[i]`.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        draws: &[ProxyDraw],
    ) {
        let needed = draws.len() as u64;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("Growing proxy uniform buffer to {capacity} slots");
            let (buffer, bind_group) = create_uniforms(device, &self.uniform_layout, capacity);
            self.uniform_buffer = buffer;
            self.uniform_bind_group = bind_group;
            self.capacity = capacity;
        }

        if !draws.is_empty() {
            let mut bytes = vec![0u8; (needed * UNIFORM_STRIDE) as usize];
            for (slot, draw) in bytes
                .chunks_exact_mut(UNIFORM_STRIDE as usize)
                .zip(draws)
            {
                let uniform = draw.uniform(view_proj);
                let src = bytemuck::bytes_of(&uniform);
                slot[..src.len()].copy_from_slice(src);
            }
            queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }
        self.prepared = draws.len() as u32;
    }

    /// Draw `mesh` with the uniforms in `slot`.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        slot: u32,
        mesh: &MeshBuffer,
        texture: &GpuTexture,
    ) {
        if slot >= self.prepared {
            log::warn!("Proxy slot {slot} was not prepared this frame");
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[uniform_offset(slot)]);
        render_pass.set_bind_group(1, &texture.bind_group, &[]);
        mesh.bind(render_pass);
        mesh.draw(render_pass);
    }
}

fn create_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slots: u64,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("proxy-uniforms"),
        size: slots * UNIFORM_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("proxy-uniform-bind-group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<ProxyUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}
