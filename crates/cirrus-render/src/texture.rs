//! RGBA8 textures with ready-to-bind bind groups.
//!
//! Both the raymarch target and the proxy albedo texture use the layout in
//! [`TextureBindings`]: a filterable 2D texture at binding 0 and a sampler at
//! binding 1, visible to the fragment stage.

use cirrus_assets::TextureImage;

const BYTES_PER_TEXEL: usize = 4;

/// Format of every texture created here. Sampling decodes sRGB to linear.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// Check that `len` bytes hold exactly `width * height` RGBA8 texels.
pub fn validate_rgba(len: usize, width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    let expected = width as usize * height as usize * BYTES_PER_TEXEL;
    if len != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: len,
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// Shared bind group layout and sampler.
pub struct TextureBindings {
    pub layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
}

impl TextureBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler-linear"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { layout, sampler }
    }
}

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
}

impl GpuTexture {
    /// Create a texture from tightly packed RGBA8 rows, top row first.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bindings: &TextureBindings,
        label: &str,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self, TextureError> {
        validate_rgba(data.len(), width, height)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout: &bindings.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&bindings.sampler),
                },
            ],
        });

        let gpu = Self {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
        };
        gpu.write(queue, data)?;
        log::debug!("Created texture '{label}' ({width}x{height})");
        Ok(gpu)
    }

    /// Upload a decoded image.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bindings: &TextureBindings,
        label: &str,
        image: &TextureImage,
    ) -> Result<Self, TextureError> {
        Self::from_rgba(
            device,
            queue,
            bindings,
            label,
            &image.rgba,
            image.width,
            image.height,
        )
    }

    /// Overwrite the whole texture. `data` must match the texture size.
    pub fn write(&self, queue: &wgpu::Queue, data: &[u8]) -> Result<(), TextureError> {
        let (width, height) = self.dimensions;
        validate_rgba(data.len(), width, height)?;
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * BYTES_PER_TEXEL as u32),
                rows_per_image: Some(height),
            },
            extent(width, height),
        );
        Ok(())
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}
