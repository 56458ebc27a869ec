//! GPU resources for the editor window and the three passes drawn into it.

use std::sync::Arc;

use glam::Mat4;
use tracing::{debug, error, info, warn};
use winit::window::Window;

use cirrus_assets::{ImportedAsset, TextureImage, unit_cube};
use cirrus_march::{FrameParams, Framebuffer, MarchStats, march_resolution, render_frame};
use cirrus_physics::BodyProxy;
use cirrus_render::{
    BLIT_SHADER_SOURCE, DepthBuffer, FrameEncoder, GpuTexture, MeshBuffer, PROXY_SHADER_SOURCE,
    ProxyDraw, ProxyPipeline, RaymarchPass, RenderContext, RenderContextError, RenderPassBuilder,
    SKY_BLUE, ShaderError, ShaderLibrary, SurfaceError, TextureBindings, TextureError,
    init_render_context_blocking,
};

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error(transparent)]
    Context(#[from] RenderContextError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("proxy cube mesh is empty")]
    EmptyCube,
}

/// Clear colour of frames drawn without the raymarch pipeline.
pub const DEGRADED_CLEAR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Tessellated egui output for one frame.
pub struct UiPaint {
    pub jobs: Vec<egui::ClippedPrimitive>,
    pub textures: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct Renderer {
    pub gpu: RenderContext,
    depth: DepthBuffer,
    // Keeps compiled modules alive alongside the pipelines built from them.
    _shaders: ShaderLibrary,
    bindings: TextureBindings,
    /// `None` when the blit shader failed to load; frames then clear to
    /// [`DEGRADED_CLEAR`] and only the UI is drawn.
    raymarch: Option<RaymarchPass>,
    proxies: Option<ProxyPipeline>,
    cube: MeshBuffer,
    albedo: GpuTexture,
    /// One entry per imported asset, `None` when the mesh could not be uploaded.
    asset_meshes: Vec<Option<MeshBuffer>>,
    framebuffer: Framebuffer,
    egui: egui_wgpu::Renderer,
    pub render_scale: f32,
    pub textured_proxies: bool,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        vsync: bool,
        render_scale: f32,
        texture: &TextureImage,
    ) -> Result<Self, RendererError> {
        let gpu = init_render_context_blocking(window, vsync)?;
        let (width, height) = gpu.size();
        let device = &gpu.device;

        let mut shaders = ShaderLibrary::new();
        let bindings = TextureBindings::new(device);
        let raymarch = loaded_or_degraded(
            "raymarch-blit",
            shaders.load_from_source(device, "raymarch-blit", BLIT_SHADER_SOURCE),
        )
        .map(|blit| RaymarchPass::new(device, &blit, &bindings, gpu.surface_format));
        let proxies = loaded_or_degraded(
            "proxy",
            shaders.load_from_source(device, "proxy", PROXY_SHADER_SOURCE),
        )
        .map(|proxy| ProxyPipeline::new(device, &proxy, &bindings, gpu.surface_format));
        let cube =
            MeshBuffer::from_mesh(device, "proxy-cube", &unit_cube()).ok_or(RendererError::EmptyCube)?;
        let albedo = GpuTexture::from_image(device, &gpu.queue, &bindings, "albedo", texture)?;
        let depth = DepthBuffer::new(device, width, height);
        let egui = egui_wgpu::Renderer::new(
            device,
            gpu.surface_format,
            egui_wgpu::RendererOptions::default(),
        );

        let (mw, mh) = march_resolution(width, height, render_scale);
        info!(width, height, march_width = mw, march_height = mh, "Renderer ready");

        Ok(Self {
            depth,
            _shaders: shaders,
            bindings,
            raymarch,
            proxies,
            cube,
            albedo,
            asset_meshes: Vec::new(),
            framebuffer: Framebuffer::new(mw, mh),
            egui,
            render_scale,
            textured_proxies: true,
            gpu,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    /// Whether the raymarched background is unavailable.
    pub fn is_degraded(&self) -> bool {
        self.raymarch.is_none()
    }

    /// Resize the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.depth.resize(&self.gpu.device, width, height);
            debug!(width, height, "Surface resized");
        }
    }

    /// Replace the albedo texture used by textured proxies.
    pub fn reload_texture(&mut self, image: &TextureImage) -> Result<(), RendererError> {
        self.albedo = GpuTexture::from_image(
            &self.gpu.device,
            &self.gpu.queue,
            &self.bindings,
            "albedo",
            image,
        )?;
        match &image.source {
            Some(path) => info!(path = %path.display(), "Texture reloaded"),
            None => warn!("Texture reloaded with fallback image"),
        }
        Ok(())
    }

    /// Upload the mesh of a newly imported asset. Indices line up with the scene's asset list.
    pub fn add_asset_mesh(&mut self, asset: &ImportedAsset) {
        let buffer = MeshBuffer::from_mesh(&self.gpu.device, &asset.name, &asset.mesh);
        self.asset_meshes.push(buffer);
    }

    /// Run the CPU kernel at the current render scale.
    pub fn march(&mut self, params: &FrameParams) -> MarchStats {
        let (width, height) = self.gpu.size();
        let (mw, mh) = march_resolution(width, height, self.render_scale);
        if self.framebuffer.resize(mw, mh) {
            debug!(width = mw, height = mh, "Raymarch framebuffer resized");
        }
        render_frame(params, &mut self.framebuffer)
    }

    pub fn march_size(&self) -> (u32, u32) {
        (self.framebuffer.width(), self.framebuffer.height())
    }

    pub fn acquire_frame(&self) -> Result<FrameEncoder, SurfaceError> {
        let surface_texture = self.gpu.get_current_texture()?;
        Ok(FrameEncoder::new(&self.gpu.device, surface_texture))
    }

    /// Upload the marched image and blit it over the whole target. Without a
    /// blit pipeline the target is only cleared.
    pub fn draw_raymarch(&mut self, frame: &mut FrameEncoder) {
        let Some(raymarch) = self.raymarch.as_mut() else {
            let builder = RenderPassBuilder::new()
                .clear_color(DEGRADED_CLEAR)
                .label("degraded-clear-pass");
            frame.begin_render_pass(&builder);
            return;
        };
        if let Err(e) = raymarch.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &self.bindings,
            &self.framebuffer,
        ) {
            warn!("Raymarch upload failed: {e}");
        }
        let builder = RenderPassBuilder::new()
            .clear_color(SKY_BLUE)
            .label("raymarch-pass");
        let mut pass = frame.begin_render_pass(&builder);
        raymarch.draw(&mut pass);
    }

    /// Dynamic physics proxies, then imported assets, depth tested.
    pub fn draw_scene(
        &mut self,
        frame: &mut FrameEncoder,
        view_proj: Mat4,
        bodies: &[BodyProxy],
        assets: &[ImportedAsset],
    ) {
        let Some(proxies) = self.proxies.as_mut() else {
            return;
        };
        let draws = scene_draws(bodies, assets, &self.asset_meshes, self.textured_proxies);
        let uniforms: Vec<ProxyDraw> = draws.iter().map(|(draw, _)| *draw).collect();
        proxies
            .prepare(&self.gpu.device, &self.gpu.queue, view_proj, &uniforms);

        let builder = RenderPassBuilder::new()
            .load_color()
            .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
            .label("raster-pass");
        let mut pass = frame.begin_render_pass(&builder);
        for (slot, (_, source)) in draws.iter().enumerate() {
            let mesh = match source {
                MeshSource::Cube => &self.cube,
                MeshSource::Asset(i) => match self.asset_meshes.get(*i) {
                    Some(Some(mesh)) => mesh,
                    _ => continue,
                },
            };
            proxies.draw(&mut pass, slot as u32, mesh, &self.albedo);
        }
    }

    /// Upload egui textures and buffers and draw the UI on top.
    ///
    /// Texture deltas are applied even when the frame was skipped, since egui
    /// sends each one only once. Returns the command buffers egui recorded,
    /// to be submitted before the frame.
    pub fn draw_ui(
        &mut self,
        frame: Option<&mut FrameEncoder>,
        paint: UiPaint,
    ) -> Vec<wgpu::CommandBuffer> {
        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        for (id, delta) in &paint.textures.set {
            self.egui.update_texture(device, queue, *id, delta);
        }

        let mut extra = Vec::new();
        if let Some(frame) = frame {
            let (width, height) = self.gpu.size();
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: paint.pixels_per_point,
            };
            let (encoder, view) = frame.parts();
            extra = self
                .egui
                .update_buffers(device, queue, encoder, &paint.jobs, &screen);
            let builder = RenderPassBuilder::new().load_color().label("ui-pass");
            let mut pass = builder.begin(encoder, view).forget_lifetime();
            self.egui.render(&mut pass, &paint.jobs, &screen);
        }

        for id in &paint.textures.free {
            self.egui.free_texture(id);
        }
        extra
    }

    pub fn present(&self, frame: FrameEncoder, extra: Vec<wgpu::CommandBuffer>) {
        frame.finish(&self.gpu.queue, extra);
    }
}

/// Keep a compiled shader, or log the failure and continue without it.
fn loaded_or_degraded<T>(name: &str, result: Result<T, ShaderError>) -> Option<T> {
    match result {
        Ok(module) => Some(module),
        Err(e) => {
            error!(shader = name, "Continuing without pipeline: {e}");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeshSource {
    Cube,
    Asset(usize),
}

/// Draw list for the raster pass. Static bodies are skipped, as are assets
/// whose mesh never reached the GPU.
fn scene_draws<M>(
    bodies: &[BodyProxy],
    assets: &[ImportedAsset],
    meshes: &[Option<M>],
    textured: bool,
) -> Vec<(ProxyDraw, MeshSource)> {
    let proxies = bodies.iter().filter(|b| !b.is_static).map(|body| {
        (
            ProxyDraw {
                model: body.model_matrix(),
                textured,
            },
            MeshSource::Cube,
        )
    });
    let imported = assets
        .iter()
        .enumerate()
        .filter(|(i, _)| matches!(meshes.get(*i), Some(Some(_))))
        .map(|(i, asset)| {
            (
                ProxyDraw {
                    model: Mat4::from_translation(asset.position),
                    textured: false,
                },
                MeshSource::Asset(i),
            )
        });
    proxies.chain(imported).collect()
}
