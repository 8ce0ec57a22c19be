use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::RenderError;
use crate::gfx::rendering::RenderEngine;

/// Windowed shell around [`Engine`]
///
/// Owns the window and the renderer. Keyboard and mouse input go to the
/// engine's input state while the cursor is captured; a left click captures
/// it and Escape releases it (or quits when already released).
pub struct KelpieApp {
    engine: Engine,
    scene_path: Option<PathBuf>,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    cursor_captured: bool,
    show_aabbs: bool,
    last_frame: Instant,
    /// First fatal error, returned from [`KelpieApp::run`]
    fatal: Option<anyhow::Error>,
}

impl KelpieApp {
    pub fn new(config: EngineConfig, scene_path: Option<PathBuf>) -> Self {
        Self {
            engine: Engine::new(config),
            scene_path,
            window: None,
            render_engine: None,
            cursor_captured: false,
            show_aabbs: false,
            last_frame: Instant::now(),
            fatal: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Run the application until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
            .ok();

        if let Some(path) = self.scene_path.clone() {
            let state = self.engine.load_scene_file(&path)?;
            info!(
                "Loaded {} ({} / {} items)",
                path.display(),
                state.progress().0,
                state.progress().1
            );
        }

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{e:#}");
        self.fatal.get_or_insert(e);
        event_loop.exit();
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if captured {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                warn!("Could not capture cursor: {e}");
                return;
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Could not release cursor: {e}");
        }
        window.set_cursor_visible(!captured);
        self.cursor_captured = captured;
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        match code {
            KeyCode::Escape if pressed => {
                if self.cursor_captured {
                    self.set_cursor_captured(false);
                } else {
                    event_loop.exit();
                }
            }
            KeyCode::KeyB if pressed && !event.repeat => {
                self.show_aabbs = !self.show_aabbs;
                self.engine.set_aabb_overlay(self.show_aabbs);
            }
            KeyCode::KeyP if pressed && !event.repeat => match self.engine.export_json() {
                Ok(json) => info!("Scene export:\n{json}"),
                Err(e) => warn!("Scene export failed: {e}"),
            },
            _ => {
                if self.cursor_captured || !pressed {
                    self.engine.input.process_keyboard(event);
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let plan = self.engine.frame(dt);
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match render_engine.render_frame(&self.engine.scene, &plan) {
            Ok(()) => {}
            Err(RenderError::Frame(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                render_engine.reconfigure();
            }
            Err(RenderError::Frame(wgpu::SurfaceError::Timeout)) => {
                warn!("Surface timed out, skipping frame");
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}

impl ApplicationHandler for KelpieApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let render_config = &self.engine.config.render;
        let attributes = Window::default_attributes()
            .with_title(render_config.title.clone())
            .with_inner_size(LogicalSize::new(
                render_config.window_width,
                render_config.window_height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let (width, height) = window.inner_size().into();

        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.engine.config.render,
            &self.engine.config.shadow,
        ));
        match renderer {
            Ok(renderer) => {
                self.engine.resize(width, height);
                self.render_engine = Some(renderer);
                self.window = Some(window);
                self.last_frame = Instant::now();
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if self.cursor_captured {
                    self.engine.select_looked_at();
                } else {
                    self.set_cursor_captured(true);
                }
            }
            WindowEvent::Focused(false) => self.set_cursor_captured(false),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.engine.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.cursor_captured {
            self.engine.input.process_device_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
