//! Render pass configuration and per-frame command encoding.
//!
//! [`RenderPassBuilder`] describes one pass declaratively. [`FrameEncoder`]
//! owns the command encoder and the acquired surface texture for a frame and
//! submits and presents both in [`FrameEncoder::finish`].

/// Sky blue clear color, shown when nothing else has been drawn.
pub const SKY_BLUE: wgpu::Color = wgpu::Color {
    r: 0.529,
    g: 0.808,
    b: 0.922,
    a: 1.0,
};

/// What happens to the color target when a pass begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorLoad {
    Clear(wgpu::Color),
    /// Keep what earlier passes drew.
    Load,
}

impl ColorLoad {
    fn op(self) -> wgpu::LoadOp<wgpu::Color> {
        match self {
            ColorLoad::Clear(color) => wgpu::LoadOp::Clear(color),
            ColorLoad::Load => wgpu::LoadOp::Load,
        }
    }
}

/// Builder for render pass descriptors with a fluent API.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    color_load: ColorLoad,
    depth: Option<(&'a wgpu::TextureView, f32)>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    /// A pass that clears to sky blue and has no depth attachment.
    pub fn new() -> Self {
        Self {
            color_load: ColorLoad::Clear(SKY_BLUE),
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.color_load = ColorLoad::Clear(color);
        self
    }

    /// Keep the existing contents of the color target.
    pub fn load_color(mut self) -> Self {
        self.color_load = ColorLoad::Load;
        self
    }

    /// Attach a depth buffer cleared to `clear_value` at the start of the pass.
    pub fn depth(mut self, view: &'a wgpu::TextureView, clear_value: f32) -> Self {
        self.depth = Some((view, clear_value));
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn color_load(&self) -> ColorLoad {
        self.color_load
    }

    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// Begin the pass on `encoder`, rendering into `color_view`.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e>
    where
        'a: 'e,
    {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: self.color_load.op(),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth
                .map(|(view, clear_value)| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

/// Command encoder plus the surface texture it renders into, for one frame.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            encoder,
            surface_texture,
            view,
        }
    }

    /// Begin a pass into the surface texture.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder<'a>,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.view)
    }

    /// The encoder and the surface view, borrowed together.
    pub fn parts(&mut self) -> (&mut wgpu::CommandEncoder, &wgpu::TextureView) {
        (&mut self.encoder, &self.view)
    }

    /// Submit `extra` command buffers followed by this frame's commands, then present.
    pub fn finish(
        self,
        queue: &wgpu::Queue,
        extra: impl IntoIterator<Item = wgpu::CommandBuffer>,
    ) {
        let commands = extra.into_iter().chain(std::iter::once(self.encoder.finish()));
        queue.submit(commands);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_sky_blue_clear() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.color_load(), ColorLoad::Clear(SKY_BLUE));
        assert!(!builder.has_depth());
    }

    #[test]
    fn test_load_color_keeps_previous_contents() {
        let builder = RenderPassBuilder::new().load_color().label("ui");
        assert_eq!(builder.color_load(), ColorLoad::Load);
        assert!(matches!(builder.color_load().op(), wgpu::LoadOp::Load));
    }

    #[test]
    fn test_clear_color_maps_to_clear_op() {
        let builder = RenderPassBuilder::new().clear_color(wgpu::Color::BLACK);
        match builder.color_load().op() {
            wgpu::LoadOp::Clear(c) => assert_eq!(c, wgpu::Color::BLACK),
            other => panic!("expected clear, got {other:?}"),
        }
    }

    #[test]
    fn test_offscreen_pass_with_depth() {
        let Some((device, queue)) = crate::test_support::create_test_device() else {
            return;
        };
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test-target"),
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = crate::DepthBuffer::new(&device, 4, 4);

        let builder = RenderPassBuilder::new()
            .depth(&depth.view, crate::DepthBuffer::CLEAR_VALUE)
            .label("test-pass");
        assert!(builder.has_depth());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-encoder"),
        });
        {
            let _pass = builder.begin(&mut encoder, &view);
        }
        queue.submit(Some(encoder.finish()));
    }
}
