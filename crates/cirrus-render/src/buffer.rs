//! Vertex and index buffers for editor meshes.

use cirrus_assets::{MeshData, Vertex};
use wgpu::util::DeviceExt;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: (std::mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Buffer layout for [`Vertex`]: position, color, uv at locations 0, 1, 2.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// An indexed mesh uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Upload `mesh`. Returns `None` for a mesh with no triangles.
    pub fn from_mesh(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Option<Self> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            log::warn!("Mesh '{label}' has no geometry, not uploading");
            return None;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }

    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;

    #[test]
    fn test_vertex_layout_matches_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);

        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);

        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(layout.attributes[2].shader_location, 2);
    }

    #[test]
    fn test_unit_cube_upload() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mesh = MeshBuffer::from_mesh(&device, "cube", &cirrus_assets::unit_cube()).unwrap();
        assert_eq!(mesh.index_count, 36);
        assert_eq!(mesh.vertex_buffer.size(), 8 * 32);
        assert_eq!(mesh.index_buffer.size(), 36 * 4);
    }

    #[test]
    fn test_empty_mesh_is_not_uploaded() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        assert!(MeshBuffer::from_mesh(&device, "empty", &MeshData::default()).is_none());
    }
}
