// Re-export all public modules so they can be used from main.rs
pub mod logging;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use crate::controller::input::wasm::{keyboard_event_to_input, mouse_move_to_input};
    use crate::controller::{FrameLoopContext, NavigationController};
    use crate::model::{Camera, Scene};
    use crate::view::{GpuContext, SkyRenderer};

    /// Main application setup for WASM
    pub async fn setup_app(
        window: &Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
    ) -> Result<(), JsValue> {
        let (width, height) = (canvas.width(), canvas.height());
        let mut gpu = GpuContext::new(canvas, width, height)
            .await
            .map_err(|e| js_error(format!("GPU init failed: {e}")))?;

        let navigation = Rc::new(RefCell::new(NavigationController::new(Camera::new(width, height))));
        let mut frame_ctx = FrameLoopContext::new(navigation.clone(), Scene::new());
        let sky = SkyRenderer::new(gpu.device.as_ref(), gpu.format);

        setup_input_listeners(document, window, navigation.clone())?;

        let performance = window
            .performance()
            .ok_or_else(|| js_error("no performance timer on window"))?;
        let window_for_loop = window.clone();
        let canvas_for_loop = canvas.clone();

        let f = RcCellCallback::new(window.clone(), move || {
            frame_ctx.update((performance.now() * 0.001) as f32);

            handle_resize(&window_for_loop, &canvas_for_loop, &mut gpu, &frame_ctx.navigation);

            let time = frame_ctx.scene.sky_time();
            sky.update(gpu.queue.as_ref(), frame_ctx.navigation.borrow().camera(), time);
            match sky.draw_frame(gpu.device.as_ref(), gpu.queue.as_ref(), &gpu.surface) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu.surface.configure(&gpu.device, &gpu.config);
                }
                Err(e) => tracing::warn!("frame skipped: {e:?}"),
            }
        });
        f.start()?;

        tracing::info!(width, height, "museum running");
        Ok(())
    }

    /// Keep canvas, surface and camera aspect in step with the window size
    fn handle_resize(
        window: &Window,
        canvas: &HtmlCanvasElement,
        gpu: &mut GpuContext,
        navigation: &Rc<RefCell<NavigationController>>,
    ) {
        let Some((w, h)) = window_size(window) else { return };
        if w == gpu.config.width && h == gpu.config.height {
            return;
        }
        canvas.set_width(w);
        canvas.set_height(h);
        gpu.resize(w, h);
        navigation.borrow_mut().resize(w, h);
    }

    fn window_size(window: &Window) -> Option<(u32, u32)> {
        let w = window.inner_width().ok()?.as_f64()? as u32;
        let h = window.inner_height().ok()?.as_f64()? as u32;
        (w > 0 && h > 0).then_some((w, h))
    }

    /// Keyboard and pointer listeners feeding the navigation controller
    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        navigation: Rc<RefCell<NavigationController>>,
    ) -> Result<(), JsValue> {
        // Keyboard down
        {
            let navigation = navigation.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                navigation.borrow_mut().process_event(&keyboard_event_to_input(&e, true));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Keyboard up
        {
            let navigation = navigation.clone();
            let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                navigation.borrow_mut().process_event(&keyboard_event_to_input(&e, false));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }

        // Mouse move: hover records position, primary-button drag looks around
        {
            let window_for_size = window.clone();
            let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
                e.prevent_default();
                navigation
                    .borrow_mut()
                    .process_event(&mouse_move_to_input(&e, &window_for_size));
            }) as Box<dyn FnMut(MouseEvent)>);
            window.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
            mm.forget();
        }

        Ok(())
    }

    pub fn init_canvas(window: &Window, document: &Document) -> Result<HtmlCanvasElement, JsValue> {
        let body = document.body().ok_or(js_error("no body on document"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;
        let (width, height) = window_size(window).unwrap_or((800, 600));
        canvas.set_width(width);
        canvas.set_height(height);
        body.append_child(&canvas)?;
        Ok(canvas)
    }

    pub fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    /// Runs a closure once per animation frame, forever
    struct RcCellCallback {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl RcCellCallback {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) -> Result<(), JsValue> {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                // Schedule the next frame
                if let Some(cb) = callback_clone.borrow().as_ref() {
                    if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        tracing::error!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }) as Box<dyn FnMut()>));

            if let Some(cb) = callback.borrow().as_ref() {
                self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
            }

            // The closure must outlive this call; the page owns it from here
            std::mem::forget(callback);
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    logging::init();

    let window = web_sys::window().ok_or(web::js_error("no global `window`"))?;
    let document = window.document().ok_or(web::js_error("no document on window"))?;
    let canvas = web::init_canvas(&window, &document)?;
    web::setup_app(&window, &document, &canvas).await
}
