use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::{
    config::AppConfig,
    error::RenderError,
    gfx::{rendering::render_engine::RenderEngine, scene::Scene},
    input::InputState,
};

pub struct HillsideApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    input: InputState,
    last_frame: Option<Instant>,
    error: Option<RenderError>,
}

impl HillsideApp {
    /// Builds the scene; the window and GPU are created once the loop resumes
    pub fn new(config: AppConfig) -> Result<Self, RenderError> {
        let event_loop = EventLoop::new()?;
        let scene = Scene::new(config.camera, config.robot, config.aspect());

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                input: InputState::new(),
                last_frame: None,
                error: None,
            },
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }

    /// Runs until Escape or close; returns the error that stopped startup, if any
    pub fn run(mut self) -> Result<(), RenderError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);
        grab_cursor(&window);

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.config,
            self.scene.drawables(),
        ))?;

        self.scene.resize(width, height);
        self.window = Some(window);
        self.render_engine = Some(renderer);
        Ok(())
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(e) = grabbed {
        log::warn!("Cursor grab unavailable: {}", e);
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                if key_code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                self.input.process_key(key_code, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.add_scroll(delta);
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.resize(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = self
                    .last_frame
                    .map(|last| (now - last).as_secs_f32())
                    .unwrap_or(0.0);
                self.last_frame = Some(now);

                self.scene.update(&mut self.input, dt);
                render_engine.update(self.scene.camera_manager.uniform());

                match render_engine.render_frame(self.scene.frame_draws()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Frame skipped: {}", e),
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.add_mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
