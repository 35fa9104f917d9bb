use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

// Import from the library crate
use museum_walk::{logging, model, view, controller};

use controller::input::{key_codes, normalize_pointer};
use controller::{FrameLoopContext, InputEvent, NavigationController};
use model::{Camera, Scene};
use view::{GpuContext, SkyRenderer};

/// Translate a physical key into the legacy key code the bindings use
fn legacy_key_code(code: KeyCode) -> Option<u32> {
    match code {
        KeyCode::KeyW => Some(key_codes::W),
        KeyCode::KeyA => Some(key_codes::A),
        KeyCode::KeyS => Some(key_codes::S),
        KeyCode::KeyD => Some(key_codes::D),
        KeyCode::KeyE => Some(key_codes::E),
        KeyCode::KeyQ => Some(key_codes::Q),
        _ => None,
    }
}

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    sky: SkyRenderer,
    frame_ctx: FrameLoopContext,
    navigation: Rc<RefCell<NavigationController>>,
    primary_down: bool,
    start: Instant,
}

impl App {
    async fn new(window: Arc<Window>) -> Result<Self, view::GpuInitError> {
        let size = window.inner_size();
        let gpu = GpuContext::new_native(window.clone(), size.width, size.height).await?;
        let sky = SkyRenderer::new(&gpu.device, gpu.format);

        let camera = Camera::new(size.width.max(1), size.height.max(1));
        let navigation = Rc::new(RefCell::new(NavigationController::new(camera)));
        let frame_ctx = FrameLoopContext::new(navigation.clone(), Scene::new());

        Ok(Self {
            window,
            gpu,
            sky,
            frame_ctx,
            navigation,
            primary_down: false,
            start: Instant::now(),
        })
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    if let Some(raw) = legacy_key_code(*code) {
                        let event = match state {
                            ElementState::Pressed => InputEvent::KeyDown(raw),
                            ElementState::Released => InputEvent::KeyUp(raw),
                        };
                        self.navigation.borrow_mut().process_event(&event);
                    }
                }
                true
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.primary_down = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = self.window.inner_size();
                if size.width > 0 && size.height > 0 {
                    let pos = normalize_pointer(
                        position.x as f32,
                        position.y as f32,
                        size.width as f32,
                        size.height as f32,
                    );
                    self.navigation.borrow_mut().process_event(&InputEvent::PointerMove {
                        x: pos.x,
                        y: pos.y,
                        primary_pressed: self.primary_down,
                    });
                }
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size.width, new_size.height);
        self.navigation.borrow_mut().process_event(&InputEvent::Resized {
            width: new_size.width,
            height: new_size.height,
        });
    }

    fn update(&mut self) {
        let time = self.start.elapsed().as_secs_f32();
        self.frame_ctx.update(time);
        let sky_time = self.frame_ctx.scene.sky_time();
        self.sky.update(&self.gpu.queue, self.navigation.borrow().camera(), sky_time);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.sky.draw_frame(&self.gpu.device, &self.gpu.queue, &self.gpu.surface)
    }
}

fn main() {
    logging::init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("failed to create event loop: {e}");
            return;
        }
    };
    let window_attributes = Window::default_attributes()
        .with_title("Museum Walk - Native")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = match event_loop.create_window(window_attributes) {
        Ok(window) => Arc::new(window),
        Err(e) => {
            tracing::error!("failed to create window: {e}");
            return;
        }
    };

    let mut app = match pollster::block_on(App::new(window.clone())) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };
    tracing::info!("museum running, WASD/EQ to move, drag with the left button to look");

    let result = event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            app.update();

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    let size = app.window.inner_size();
                                    app.resize(size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => tracing::warn!("frame skipped: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    });
    if let Err(e) = result {
        tracing::error!("event loop exited with error: {e}");
    }
}
