//! Window creation, event routing and the per-frame pipeline.
//!
//! Events go to egui first. Keyboard and mouse state is still updated for
//! releases so nothing sticks when egui swallows the matching press.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use cirrus_assets::{ImportedAsset, TextureSearch};
use cirrus_config::Config;
use cirrus_editor::{CursorRequest, EditorCamera, InputFrame, ModeController, Viewport};
use cirrus_input::{CursorMode, KeyboardState, MouseState, cursor::apply_cursor_mode};
use cirrus_march::FrameParams;
use cirrus_physics::{BodyProxy, PhysicsWorld};
use cirrus_render::FrameEncoder;

use crate::frame_clock::FrameClock;
use crate::orchestrator::{FramePlan, FrameStage};
use crate::renderer::{Renderer, UiPaint};
use crate::scene::{EditorScene, SceneSettings};
use crate::stats::FrameStats;
use crate::ui::{EditorPanels, PanelView, UiActions, UiState};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Initial camera from the config's scene section.
pub fn camera_from_config(config: &Config) -> EditorCamera {
    let c = &config.scene.camera;
    EditorCamera {
        position: glam::Vec3::from_array(c.position),
        yaw: c.yaw,
        pitch: c.pitch,
        zoom: c.zoom,
        speed: config.input.move_speed,
        sensitivity: config.input.mouse_sensitivity,
    }
}

/// Intermediate products of one frame, filled in stage by stage.
#[derive(Default)]
struct FrameWork {
    dt: f32,
    time: f32,
    bodies: Option<Vec<BodyProxy>>,
    actions: Option<UiActions>,
    paint: Option<UiPaint>,
    params: Option<FrameParams>,
    view_proj: Option<Mat4>,
    target: Option<FrameEncoder>,
    ui_commands: Vec<wgpu::CommandBuffer>,
}

pub struct App {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    ui: Option<UiState>,
    panels: EditorPanels,
    scene: EditorScene,
    physics: PhysicsWorld,
    camera: EditorCamera,
    controller: ModeController,
    viewport: Viewport,
    keyboard: KeyboardState,
    mouse: MouseState,
    clock: FrameClock,
    stats: FrameStats,
    textures: TextureSearch,
    startup_import: Option<PathBuf>,
    start_playing: bool,
}

impl App {
    pub fn new(config: Config, startup_import: Option<PathBuf>, start_playing: bool) -> Self {
        let mut controller = ModeController::new(config.input.lock_mouse_in_play);
        controller.invert_y = config.input.invert_y;

        Self {
            panels: EditorPanels::new(config.debug.show_stats),
            scene: EditorScene::new(SceneSettings::from_config(&config.scene)),
            physics: PhysicsWorld::with_demo_scene(),
            camera: camera_from_config(&config),
            controller,
            viewport: Viewport::new(config.window.width, config.window.height),
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            clock: FrameClock::new(Instant::now()),
            stats: FrameStats::new(),
            textures: TextureSearch::from_environment(),
            window: None,
            renderer: None,
            ui: None,
            startup_import,
            start_playing,
            config,
        }
    }

    /// Apply whatever cursor change the controller wants.
    fn apply_cursor(&mut self, window: &Window) {
        let mode = match self.controller.take_cursor_request() {
            CursorRequest::Capture => CursorMode::Captured,
            CursorRequest::Release => CursorMode::Free,
            CursorRequest::Keep => return,
        };
        apply_cursor_mode(window, mode);
        self.mouse.set_captured(mode.is_captured());
    }

    fn toggle_play(&mut self, window: &Window) {
        if self.controller.mode().is_playing() {
            self.controller.exit_play(&mut self.mouse);
        } else {
            self.controller.enter_play(&mut self.mouse);
        }
        self.apply_cursor(window);
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn import_asset(&mut self, path: &Path) {
        let Some(renderer) = self.renderer.as_mut() else {
            warn!("Import skipped: renderer not initialized");
            return;
        };
        match ImportedAsset::load(path) {
            Ok(asset) => {
                renderer.add_asset_mesh(&asset);
                self.scene.add_asset(asset);
            }
            Err(e) => warn!("Import failed: {e}"),
        }
    }

    fn reload_texture(&mut self) {
        let image = self.textures.load_first();
        if let Some(renderer) = self.renderer.as_mut()
            && let Err(e) = renderer.reload_texture(&image)
        {
            warn!("Texture upload failed: {e}");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.viewport.resize(width, height)
            && let Some(renderer) = self.renderer.as_mut()
        {
            renderer.resize(width, height);
        }
    }

    fn redraw(&mut self, window: &Window) {
        let now = Instant::now();
        let mut work = FrameWork {
            dt: self.clock.tick(now),
            time: self.clock.elapsed(now),
            ..Default::default()
        };

        let plan = FramePlan::for_mode(self.controller.mode());
        for &stage in plan.stages() {
            self.run_stage(stage, window, &mut work);
        }

        self.stats.record(work.dt);
        self.keyboard.clear_transients();
        self.mouse.clear_transients();
    }

    fn run_stage(&mut self, stage: FrameStage, window: &Window, work: &mut FrameWork) {
        match stage {
            FrameStage::Input => self.stage_input(window, work.dt),
            FrameStage::Physics => {
                self.physics.step(work.dt);
            }
            FrameStage::Ui => {
                self.stage_ui(window, work);
                if let Some(actions) = work.actions.take() {
                    self.apply_actions(actions, window, work);
                }
            }
            FrameStage::Snapshot => {
                let aspect = self.viewport.aspect();
                let block = self.camera.camera_block(aspect, work.time);
                work.params = Some(self.scene.settings.frame_params(block));
                work.view_proj = Some(self.camera.view_projection(aspect));
            }
            FrameStage::Raymarch => {
                let (Some(renderer), Some(params)) = (self.renderer.as_mut(), work.params) else {
                    return;
                };
                match renderer.acquire_frame() {
                    Ok(mut target) => {
                        if !renderer.is_degraded() {
                            renderer.march(&params);
                            self.stats.march_size = renderer.march_size();
                        }
                        renderer.draw_raymarch(&mut target);
                        work.target = Some(target);
                    }
                    Err(e) => warn!("Skipping frame: {e}"),
                }
            }
            FrameStage::Raster => {
                let (Some(renderer), Some(target), Some(view_proj)) =
                    (self.renderer.as_mut(), work.target.as_mut(), work.view_proj)
                else {
                    return;
                };
                let bodies = work.bodies.get_or_insert_with(|| self.physics.snapshot());
                renderer.draw_scene(target, view_proj, bodies, &self.scene.assets);
            }
            FrameStage::Overlay => {
                if let (Some(renderer), Some(paint)) = (self.renderer.as_mut(), work.paint.take()) {
                    work.ui_commands = renderer.draw_ui(work.target.as_mut(), paint);
                }
            }
            FrameStage::Present => {
                if let (Some(renderer), Some(target)) = (self.renderer.as_ref(), work.target.take()) {
                    renderer.present(target, std::mem::take(&mut work.ui_commands));
                }
            }
        }
    }

    fn stage_input(&mut self, window: &Window, dt: f32) {
        let (ui_wants_pointer, ui_wants_keyboard) = self
            .ui
            .as_ref()
            .map_or((false, false), |ui| (ui.wants_pointer(), ui.wants_keyboard()));

        let events = self.controller.update(
            InputFrame {
                keyboard: &self.keyboard,
                mouse: &mut self.mouse,
                ui_wants_pointer,
                ui_wants_keyboard,
                orbit_target: self.scene.selected_position(),
                dt,
            },
            &mut self.camera,
        );
        if events.reload_texture {
            self.reload_texture();
        }
        self.apply_cursor(window);
    }

    fn stage_ui(&mut self, window: &Window, work: &mut FrameWork) {
        let (Some(ui), Some(renderer)) = (self.ui.as_mut(), self.renderer.as_mut()) else {
            return;
        };
        let bodies = work.bodies.get_or_insert_with(|| self.physics.snapshot());
        let mode = self.controller.mode();
        let view = PanelView {
            scene: &mut self.scene,
            camera: &mut self.camera,
            lock_mouse_in_play: &mut self.controller.lock_mouse_in_play,
            render_scale: &mut renderer.render_scale,
            mode,
            stats: &self.stats,
            bodies,
        };
        let (actions, paint) = ui.run(window, &mut self.panels, view);
        work.actions = Some(actions);
        work.paint = Some(paint);
    }

    fn apply_actions(&mut self, actions: UiActions, window: &Window, work: &mut FrameWork) {
        if actions.toggle_play {
            self.toggle_play(window);
        }
        if let Some(path) = actions.import {
            self.import_asset(&path);
        }
        if actions.reload_texture {
            self.reload_texture();
        }
        if actions.reset_physics {
            info!("Physics scene reset");
            self.physics.load_demo_scene();
            work.bodies = None;
        }
        if let Some(target) = actions.focus {
            self.camera.focus_on(target);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let texture = self.textures.load_first();
        let mut renderer = match Renderer::new(
            window.clone(),
            self.config.window.vsync,
            self.config.render.render_scale,
            &texture,
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };
        renderer.textured_proxies = self.config.render.textured_proxies;

        let size = window.inner_size();
        self.viewport = Viewport::new(size.width, size.height);
        self.ui = Some(UiState::new(&window));
        self.renderer = Some(renderer);
        self.window = Some(window.clone());

        if let Some(path) = self.startup_import.take() {
            self.import_asset(&path);
        }
        if self.start_playing {
            self.toggle_play(&window);
        }
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let consumed = self
            .ui
            .as_mut()
            .is_some_and(|ui| ui.on_window_event(&window, &event));

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = window.inner_size();
                info!(scale_factor, "Scale factor changed");
                self.resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !consumed || event.state == ElementState::Released {
                    self.keyboard.process_event(&event);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if !consumed || state == ElementState::Released {
                    self.mouse.on_button(button, state);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !consumed {
                    self.mouse.on_scroll(delta);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(&window);
                window.request_redraw();
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }
}
