//! Browser host (wasm32, feature `web`).
//!
//! The canvas fills `document.body`: its backing store is sized in device
//! pixels while its CSS box stays in logical pixels. Frames come from
//! `requestAnimationFrame`, and a settled resize is applied from a
//! `setTimeout` armed for the debounce deadline.
//!
//! The page forwards DOM events to the exported [`WebViewer`]:
//!
//! ```js
//! const canvas = document.getElementById("scene");
//! const viewer = await start_viewer("scene");
//! window.addEventListener("resize", () => viewer.resize());
//! canvas.addEventListener("pointermove", (e) => viewer.pointer_move(e.offsetX, e.offsetY));
//! canvas.addEventListener("pointerdown", (e) => viewer.pointer_button(e.button, true));
//! canvas.addEventListener("pointerup", (e) => viewer.pointer_button(e.button, false));
//! canvas.addEventListener("pointerleave", () => viewer.pointer_leave());
//! canvas.addEventListener("wheel", (e) => viewer.wheel(e.deltaY));
//! window.addEventListener("keydown", (e) => viewer.key(e.code, e.shiftKey, e.repeat));
//! window.addEventListener("keyup", (e) => viewer.set_shift(e.shiftKey));
//! window.addEventListener("blur", () => viewer.blur());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;
use web_time::Instant;

use crate::engine::command::Command;
use crate::engine::SceneEngine;
use crate::error::OrbitError;
use crate::frame::{FrameOutcome, FrameRequester, FrameScheduler};
use crate::input::{InputEvent, InputProcessor, MouseButton};
use crate::options::Options;
use crate::util::debounce::Debounced;
use crate::viewport::{
    to_backing, DrawingSurface, SyncReport, ViewportHost, ViewportSizer,
    ViewportState,
};

/// `deltaY` of one wheel notch in pixel mode, mapped to one zoom step.
const WHEEL_PIXELS_PER_STEP: f32 = 100.0;

impl From<OrbitError> for JsValue {
    fn from(e: OrbitError) -> Self {
        Self::from_str(&e.to_string())
    }
}

/// Look up a `<canvas>` by element id.
///
/// # Errors
///
/// Returns [`OrbitError::MissingSurface`] if there is no document, no
/// element with that id, or the element is not a canvas.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, OrbitError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| OrbitError::MissingSurface(id.to_owned()))
}

/// The document body as a viewport host.
pub struct DocumentHost {
    window: web_sys::Window,
}

impl DocumentHost {
    /// Host for the current browsing context, if there is one.
    #[must_use]
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl ViewportHost for DocumentHost {
    fn content_size(&self) -> (u32, u32) {
        self.window.document().and_then(|d| d.body()).map_or(
            (0, 0),
            |body| {
                (
                    body.offset_width().max(0) as u32,
                    body.offset_height().max(0) as u32,
                )
            },
        )
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

/// A canvas element as a drawing surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    density: f64,
}

impl CanvasSurface {
    /// Wrap `canvas` at density 1.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            density: 1.0,
        }
    }

    /// The wrapped element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingSurface for CanvasSurface {
    fn set_pixel_density(&mut self, ratio: f64) {
        self.density = ratio;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(to_backing(width, self.density));
        self.canvas.set_height(to_backing(height, self.density));
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
    }
}

// ── Browser callbacks ────────────────────────────────────────────────────

/// `requestAnimationFrame` as a [`FrameRequester`].
struct AnimationFrames {
    window: web_sys::Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameRequester for AnimationFrames {
    fn request_frame(&self) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        if let Err(e) = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            log::warn!("requestAnimationFrame failed: {e:?}");
        }
    }
}

/// One-shot `setTimeout` for the resize debounce deadline.
struct DeadlineTimer {
    window: web_sys::Window,
    callback: Option<Closure<dyn FnMut()>>,
    handle: Option<i32>,
}

impl DeadlineTimer {
    /// Fire once at `deadline`, replacing any armed timeout.
    fn arm(&mut self, deadline: Instant) {
        self.disarm();
        let Some(callback) = &self.callback else {
            return;
        };
        let wait = deadline.saturating_duration_since(Instant::now());
        // Round up so the timeout never lands before the deadline.
        let ms = i32::try_from(wait.as_millis() + 1).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms,
            ) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::warn!("setTimeout failed: {e:?}"),
        }
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// Engine plus the canvas it draws to: the target of a settled resize.
struct Stage {
    engine: SceneEngine,
    canvas: CanvasSurface,
}

type OnResize = fn(&mut Stage, ViewportState) -> SyncReport;

fn resize_stage(stage: &mut Stage, state: ViewportState) -> SyncReport {
    let report = stage.engine.apply_viewport(state);
    if report.resized {
        stage.canvas.set_pixel_density(state.pixel_ratio);
        stage.canvas.resize(state.width, state.height);
    }
    report
}

struct WebApp {
    stage: Stage,
    host: DocumentHost,
    scheduler: FrameScheduler,
    input: InputProcessor,
    resize: Debounced<ViewportState, OnResize>,
    frames: AnimationFrames,
    timer: DeadlineTimer,
}

impl WebApp {
    fn redraw(&mut self) {
        let now = Instant::now();
        let engine = &mut self.stage.engine;
        let outcome = self.scheduler.run_frame(&self.frames, now, |tick| {
            engine.frame(&tick).map(|_| ())
        });

        if let FrameOutcome::Failed(e) = outcome {
            if e.is_surface_lost() {
                if self.resize.flush(&mut self.stage).is_none() {
                    self.stage.engine.reconfigure_surface();
                }
                let _ = self.scheduler.request_once(&self.frames);
            }
        }

        if self.stage.engine.needs_redraw() {
            let _ = self.scheduler.request_once(&self.frames);
        }

        let engine = &mut self.stage.engine;
        if let Some(fps) = engine.fps_report(now) {
            if engine.options().display.show_fps_in_title {
                if let Some(document) = self.frames.window.document() {
                    document.set_title(&format!("orbitview - {fps:.0} fps"));
                }
            }
        }
    }

    /// Apply a resize whose quiet period has passed, or re-arm for the
    /// remaining time.
    fn settle_resize(&mut self) {
        if let Some(report) = self.resize.poll(&mut self.stage) {
            if report.resized {
                let _ = self.scheduler.request_once(&self.frames);
            }
        }
        if let Some(deadline) = self.resize.next_deadline() {
            self.timer.arm(deadline);
        }
    }

    fn schedule_resize(&mut self) {
        let state = self.stage.engine.measure(&self.host);
        let _ = self.resize.trigger(state);
        if let Some(deadline) = self.resize.next_deadline() {
            self.timer.arm(deadline);
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle_event(event) {
            self.dispatch(command);
        }
    }

    /// Host commands are handled here; the rest go to the engine.
    fn dispatch(&mut self, command: Command) {
        match command {
            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::ToggleFrameLoop => {
                if self.scheduler.is_running() {
                    let _ = self.scheduler.stop();
                    log::info!("frame loop stopped");
                } else {
                    let _ = self.scheduler.start(&self.frames);
                    log::info!("frame loop started");
                }
            }
            command => {
                if self.stage.engine.execute(command) {
                    let _ = self.scheduler.request_once(&self.frames);
                }
            }
        }
    }

    fn toggle_fullscreen(&self) {
        let Some(document) = self.frames.window.document() else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
        } else if let Err(e) = self.stage.canvas.canvas().request_fullscreen() {
            log::warn!("fullscreen refused: {e:?}");
        }
    }
}

/// A running scene on a canvas, driven by the page's DOM events.
///
/// Created by [`start_viewer`]. Dropping it (`free()` from JS) stops the
/// animation-frame and timer callbacks.
#[wasm_bindgen]
pub struct WebViewer {
    app: Rc<RefCell<WebApp>>,
}

impl WebViewer {
    fn with_app(&self, f: impl FnOnce(&mut WebApp)) {
        match self.app.try_borrow_mut() {
            Ok(mut app) => f(&mut app),
            Err(_) => log::warn!("viewer busy, event dropped"),
        }
    }
}

#[wasm_bindgen]
impl WebViewer {
    /// Re-measure the document and restart the resize debounce.
    pub fn resize(&self) {
        self.with_app(WebApp::schedule_resize);
    }

    /// Cursor position in CSS pixels relative to the canvas.
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.with_app(|app| {
            let ratio = app
                .stage
                .engine
                .viewport()
                .map_or(1.0, |v| v.pixel_ratio as f32);
            app.handle_input(InputEvent::CursorMoved {
                x: x * ratio,
                y: y * ratio,
            });
        });
    }

    /// `MouseEvent.button` went down or up.
    pub fn pointer_button(&self, button: i16, pressed: bool) {
        let button = MouseButton::from_dom(button);
        self.with_app(|app| {
            app.handle_input(InputEvent::MouseButton { button, pressed });
        });
    }

    /// The pointer left the canvas.
    pub fn pointer_leave(&self) {
        self.with_app(|app| app.handle_input(InputEvent::CursorLeft));
    }

    /// `WheelEvent.deltaY` in pixels; positive scrolls away from the scene.
    pub fn wheel(&self, delta_y: f32) {
        let delta = -delta_y / WHEEL_PIXELS_PER_STEP;
        self.with_app(|app| app.handle_input(InputEvent::Scroll { delta }));
    }

    /// Shift state from any keyboard event.
    pub fn set_shift(&self, shift: bool) {
        self.with_app(|app| {
            app.handle_input(InputEvent::ModifiersChanged { shift });
        });
    }

    /// A key went down. `code` is `KeyboardEvent.code` (`"KeyW"`,
    /// `"Space"`), which matches the binding names.
    pub fn key(&self, code: &str, shift: bool, repeat: bool) {
        self.with_app(|app| {
            app.handle_input(InputEvent::ModifiersChanged { shift });
            if repeat {
                return;
            }
            let action = app.stage.engine.options().keybindings.lookup(code);
            if let Some(action) = action {
                app.dispatch(action.to_command());
            }
        });
    }

    /// The page lost focus.
    pub fn blur(&self) {
        self.with_app(|app| app.handle_input(InputEvent::FocusLost));
    }

    /// Start the continuous frame loop.
    pub fn start(&self) {
        self.with_app(|app| {
            let _ = app.scheduler.start(&app.frames);
        });
    }

    /// Stop the frame loop; input and resizes still draw on demand.
    pub fn stop(&self) {
        self.with_app(|app| {
            let _ = app.scheduler.stop();
        });
    }

    /// Whether the continuous loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.app
            .try_borrow()
            .is_ok_and(|app| app.scheduler.is_running())
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.app.try_borrow().map_or(0.0, |app| app.stage.engine.fps())
    }
}

impl Drop for WebViewer {
    fn drop(&mut self) {
        if let Ok(mut app) = self.app.try_borrow_mut() {
            let _ = app.scheduler.stop();
            app.timer.disarm();
            let _ = app.frames.callback.borrow_mut().take();
        }
    }
}

/// Install the console logger and panic hook, size the canvas to the
/// document body, build the engine on it, and start the frame loop.
///
/// `options_toml` is an optional options preset; missing fields use
/// defaults.
///
/// # Errors
///
/// Fails if the canvas or browser window is missing, the preset does not
/// parse, or no GPU adapter is available.
#[allow(clippy::needless_pass_by_value)]
#[wasm_bindgen]
pub async fn start_viewer(
    canvas_id: String,
    options_toml: Option<String>,
) -> Result<WebViewer, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let options = match options_toml {
        Some(text) => Options::from_toml_str(&text)?,
        None => Options::default(),
    };
    let canvas = canvas_by_id(&canvas_id)?;
    let host = DocumentHost::new()
        .ok_or_else(|| JsValue::from_str("no browser window"))?;
    let window = host.window.clone();

    let viewport =
        ViewportSizer::new(options.display.max_pixel_ratio).measure(&host);
    let mut surface = CanvasSurface::new(canvas.clone());
    surface.set_pixel_density(viewport.pixel_ratio);
    surface.resize(viewport.width, viewport.height);

    let delay = options.display.resize_debounce();
    let engine = SceneEngine::new(
        wgpu::SurfaceTarget::Canvas(canvas),
        viewport,
        options,
    )
    .await?;
    log::info!(
        "canvas '{canvas_id}' ready at {}x{} @{:.2}",
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );

    let app = Rc::new(RefCell::new(WebApp {
        stage: Stage {
            engine,
            canvas: surface,
        },
        host,
        scheduler: FrameScheduler::new(),
        input: InputProcessor::new(),
        resize: Debounced::new(delay, resize_stage),
        frames: AnimationFrames {
            window: window.clone(),
            callback: Rc::new(RefCell::new(None)),
        },
        timer: DeadlineTimer {
            window,
            callback: None,
            handle: None,
        },
    }));
    install_callbacks(&app);

    if let Ok(mut started) = app.try_borrow_mut() {
        let started = &mut *started;
        let _ = started.scheduler.start(&started.frames);
    }
    Ok(WebViewer { app })
}

/// Give the frame and timer callbacks weak handles to `app`, so they go
/// quiet once the viewer is dropped.
fn install_callbacks(app: &Rc<RefCell<WebApp>>) {
    let weak: Weak<RefCell<WebApp>> = Rc::downgrade(app);
    let on_frame = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        let Some(app) = weak.upgrade() else {
            return;
        };
        if let Ok(mut app) = app.try_borrow_mut() {
            app.redraw();
        }
    });

    let weak = Rc::downgrade(app);
    let on_deadline = Closure::<dyn FnMut()>::new(move || {
        let Some(app) = weak.upgrade() else {
            return;
        };
        if let Ok(mut app) = app.try_borrow_mut() {
            app.timer.handle = None;
            app.settle_resize();
        }
    });

    if let Ok(mut app) = app.try_borrow_mut() {
        *app.frames.callback.borrow_mut() = Some(on_frame);
        app.timer.callback = Some(on_deadline);
    }
}

