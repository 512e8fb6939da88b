//! Windowed runner.
//!
//! A thin winit driver around [`Scene`]: every redraw ticks the scene,
//! uploads flagged particle buffers and renders.

use std::sync::Arc;

use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::Config;
use crate::error::AppError;
use crate::gpu::{GpuState, SurfaceContext};
use crate::input::{Input, InputAction};
use crate::scene::Scene;
use crate::time::FrameClock;

pub const WINDOW_TITLE: &str = "Nebula";

/// Seconds the pattern name stays in the title bar.
pub const BANNER_SECONDS: f64 = 2.5;

/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 300;

/// Open a window and run until it is closed.
pub fn run(config: Config) -> Result<(), AppError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Pattern name shown in the title until `until` seconds of scene time.
struct Banner {
    until: f64,
}

fn banner_title(name: &str) -> String {
    format!("{WINDOW_TITLE} - {name}")
}

struct App {
    config: Config,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Option<Scene>,
    input: Input,
    clock: FrameClock,
    banner: Option<Banner>,
    startup_error: Option<AppError>,
}

impl App {
    fn new(config: Config) -> Self {
        let input = Input::new(config.window_width, config.window_height);
        Self {
            config,
            window: None,
            gpu_state: None,
            scene: None,
            input,
            clock: FrameClock::new(),
            banner: None,
            startup_error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        let context = pollster::block_on(SurfaceContext::new(window.clone()))?;

        let mut scene = Scene::new(&self.config)?;
        scene.set_viewport(size.width, size.height);
        self.input.set_window_size(size.width, size.height);

        window.set_title(&banner_title(scene.pattern().name()));
        self.banner = Some(Banner {
            until: scene.elapsed() + BANNER_SECONDS,
        });

        self.gpu_state = Some(GpuState::new(context, &scene, &self.config.bloom));
        self.scene = Some(scene);
        self.window = Some(window);
        self.clock.reset();
        Ok(())
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        match action {
            InputAction::Pointer(ndc) => scene.set_pointer_ndc(ndc),
            InputAction::Trigger(ndc) => {
                if let Some(ndc) = ndc {
                    scene.set_pointer_ndc(ndc);
                }
                let change = scene.trigger();
                if let Some(window) = &self.window {
                    window.set_title(&banner_title(change.name));
                }
                self.banner = Some(Banner {
                    until: scene.elapsed() + BANNER_SECONDS,
                });
            }
            InputAction::Exit => event_loop.exit(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(scene), Some(gpu_state)) = (&mut self.scene, &mut self.gpu_state) else {
            return;
        };

        let delta = self.clock.tick();
        let frame = scene.tick(delta);

        if let Some(banner) = &self.banner {
            if frame.elapsed >= banner.until {
                if let Some(window) = &self.window {
                    window.set_title(WINDOW_TITLE);
                }
                self.banner = None;
            }
        }

        gpu_state.sync_particles(scene.field_mut());

        match gpu_state.render(scene) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("skipping frame: {e}"),
        }

        if self.clock.frame() % FPS_LOG_INTERVAL == 0 {
            debug!("{:.1} fps", self.clock.fps());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            error!("startup failed: {err}");
            self.startup_error = Some(err);
            event_loop.exit();
            return;
        }
        info!(
            "window open: {} particles, transition speed {}",
            self.config.particle_count, self.config.transition_speed
        );
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(scene) = &mut self.scene {
                    scene.set_viewport(physical_size.width, physical_size.height);
                }
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            event => {
                if let Some(action) = self.input.handle_event(&event) {
                    self.handle_action(event_loop, action);
                }
            }
        }
    }
}
