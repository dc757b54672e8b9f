use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use clap::Parser;
use glam::Vec3;
use tracing::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use touchnav::{
    logging,
    controller::{InputEvent, LocalSurface, PointerButton, TouchController},
    model::{ControllerConfig, Object3D, Viewport},
};

/// Fly a camera around with WASD/arrows (R/F up/down) and the mouse buttons
#[derive(Parser, Debug)]
#[command(name = "touchnav", version)]
struct Args {
    /// Controller settings as TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Enable continuous pointer look
    #[arg(long)]
    look: bool,
}

struct App {
    window: Option<Window>,
    camera: Rc<RefCell<Object3D>>,
    controller: TouchController<Object3D, LocalSurface>,
    last_frame: Instant,
    last_report: Instant,
}

impl App {
    fn new(config: ControllerConfig) -> Result<Self, touchnav::ControlError> {
        let camera = Rc::new(RefCell::new(Object3D::new(Vec3::new(0.0, 1.6, 5.0))));
        let mut controller = TouchController::with_surface(camera.clone(), LocalSurface::default())?
            .with_config(config);
        controller.look_at(Vec3::new(0.0, 1.6, 0.0))?;

        Ok(Self {
            window: None,
            camera,
            controller,
            last_frame: Instant::now(),
            last_report: Instant::now(),
        })
    }

    fn emit(&self, event: InputEvent) {
        if let Some(surface) = self.controller.surface() {
            surface.emit(&event);
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        self.controller.update(dt);

        if now.duration_since(self.last_report).as_secs_f32() >= 1.0 {
            self.last_report = now;
            let cam = self.camera.borrow();
            let snapshot = self.controller.orientation_snapshot();
            debug!(
                x = cam.position.x,
                y = cam.position.y,
                z = cam.position.z,
                lat = snapshot.lat,
                lon = snapshot.lon,
                "camera"
            );
        }
    }
}

fn web_button(button: MouseButton) -> i16 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(b) => b as i16,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(Window::default_attributes().with_title("touchnav")) {
            Ok(window) => {
                let size = window.inner_size();
                let viewport = Viewport::new(size.width as f32, size.height as f32);
                if let Some(surface) = self.controller.surface_mut() {
                    surface.set_viewport(viewport);
                }
                self.controller.handle_resize();
                self.window = Some(window);
                info!(width = size.width, height = size.height, "window created");
            }
            Err(e) => {
                error!("window creation failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.controller.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let viewport = Viewport::new(size.width as f32, size.height as f32);
                if let Some(surface) = self.controller.surface_mut() {
                    surface.set_viewport(viewport);
                }
                self.emit(InputEvent::Resize(viewport));
            }
            WindowEvent::Focused(false) => self.emit(InputEvent::FocusLost),
            WindowEvent::KeyboardInput { event, .. } => {
                // winit's KeyCode debug names match KeyboardEvent.code (`KeyW`, `ArrowUp`)
                if let PhysicalKey::Code(code) = event.physical_key {
                    let code = format!("{code:?}");
                    match event.state {
                        ElementState::Pressed => self.emit(InputEvent::KeyDown(code)),
                        ElementState::Released => self.emit(InputEvent::KeyUp(code)),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = PointerButton::from_web_button(web_button(button));
                match state {
                    ElementState::Pressed => self.emit(InputEvent::PointerDown { button }),
                    ElementState::Released => self.emit(InputEvent::PointerUp { button }),
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.emit(InputEvent::PointerMove {
                page_x: position.x as f32,
                page_y: position.y as f32,
            }),
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_config(args: &Args) -> Result<ControllerConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ControllerConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => ControllerConfig::default(),
    };
    if args.look {
        config.continuous_look = true;
    }
    Ok(config)
}

fn main() {
    logging::init();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("could not load config: {e}");
            std::process::exit(2);
        }
    };
    info!(?config, "starting");

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("controller setup failed: {e}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("event loop creation failed: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("event loop exited with error: {e}");
    }
}
