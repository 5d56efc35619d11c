//! Standalone window backed by winit.
//!
//! Window resizes and scale-factor changes are debounced before they reach
//! the surface; frames are driven by the display through `request_redraw`.
//!
//! ```no_run
//! # use orbitview::Viewer;
//! Viewer::builder()
//!     .with_title("orbitview")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    engine::command::Command,
    engine::SceneEngine,
    error::OrbitError,
    frame::{FrameOutcome, FrameScheduler},
    input::{InputEvent, InputProcessor, MouseButton},
    options::Options,
    util::debounce::Debounced,
    viewport::{SyncReport, ViewportSizer, ViewportState},
};

/// Resize callback run once a burst of window events settles.
type OnResize = fn(&mut SceneEngine, ViewportState) -> SyncReport;

/// Pixel wheel deltas are scaled to roughly match one line step.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "orbitview".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing the demo scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::Viewer`] if the event loop cannot be created
    /// or exits abnormally.
    pub fn run(self) -> Result<(), OrbitError> {
        let event_loop =
            EventLoop::new().map_err(|e| OrbitError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            resize: Debounced::new(
                self.options.display.resize_debounce(),
                SceneEngine::apply_viewport,
            ),
            scheduler: FrameScheduler::new(),
            input: InputProcessor::new(),
            options: Some(self.options),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| OrbitError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<SceneEngine>,
    resize: Debounced<ViewportState, OnResize>,
    scheduler: FrameScheduler,
    input: InputProcessor,
    /// Handed to the engine on `resumed`.
    options: Option<Options>,
    title: String,
}

impl ViewerApp {
    /// Route an input event through the processor and run what it yields.
    fn handle_input(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle_event(event) {
            self.dispatch(command);
        }
    }

    /// Host commands are handled here; the rest go to the engine.
    fn dispatch(&mut self, command: Command) {
        let Some(window) = self.window.clone() else {
            return;
        };
        match command {
            Command::ToggleFullscreen => {
                let next = if window.fullscreen().is_some() {
                    None
                } else {
                    Some(Fullscreen::Borderless(None))
                };
                window.set_fullscreen(next);
            }
            Command::ToggleFrameLoop => {
                if self.scheduler.is_running() {
                    let _ = self.scheduler.stop();
                    log::info!("frame loop stopped");
                } else {
                    let _ = self.scheduler.start(window.as_ref());
                    log::info!("frame loop started");
                }
            }
            command => {
                let Some(engine) = &mut self.engine else {
                    return;
                };
                if engine.execute(command) {
                    let _ = self.scheduler.request_once(window.as_ref());
                }
            }
        }
    }

    /// Measure the window and (re)arm the resize debounce.
    fn schedule_resize(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &self.engine) else {
            return;
        };
        let state = engine.measure(window.as_ref());
        let _ = self.resize.trigger(state);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        let now = Instant::now();
        let outcome =
            self.scheduler.run_frame(window.as_ref(), now, |tick| {
                engine.frame(&tick).map(|_| ())
            });

        match outcome {
            FrameOutcome::Idle | FrameOutcome::Completed => {}
            FrameOutcome::Failed(e) if e.is_surface_lost() => {
                // A pending resize already carries the right size.
                if self.resize.flush(engine).is_none() {
                    engine.reconfigure_surface();
                }
                let _ = self.scheduler.request_once(window.as_ref());
            }
            FrameOutcome::Failed(OrbitError::Surface(
                wgpu::SurfaceError::OutOfMemory,
            )) => {
                log::error!("surface out of memory, exiting");
                event_loop.exit();
                return;
            }
            FrameOutcome::Failed(_) => {}
        }

        // On demand, keep drawing until damped motion comes to rest.
        if engine.needs_redraw() {
            let _ = self.scheduler.request_once(window.as_ref());
        }

        if let Some(fps) = engine.fps_report(now) {
            if engine.options().display.show_fps_in_title {
                window.set_title(&format!("{} - {fps:.0} fps", self.title));
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let size = mon.size().to_logical::<f64>(mon.scale_factor());
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    size.width * 0.75,
                    size.height * 0.75,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let options = self.options.take().unwrap_or_default();
        self.resize.set_delay(options.display.resize_debounce());
        let viewport = ViewportSizer::new(
            options.display.max_pixel_ratio,
        )
        .measure(window.as_ref());

        let engine = match pollster::block_on(SceneEngine::new(
            window.clone(),
            viewport,
            options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        let _ = self.scheduler.start(window.as_ref());
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.schedule_resize();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => {
                self.handle_input(InputEvent::CursorLeft);
            }

            WindowEvent::Focused(false) => {
                self.handle_input(InputEvent::FocusLost);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => {
                        pos.y as f32 * PIXEL_SCROLL_SCALE
                    }
                };
                self.handle_input(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key_str = format!("{code:?}");
                let action = self
                    .engine
                    .as_ref()
                    .and_then(|e| e.options().keybindings.lookup(&key_str));
                if let Some(action) = action {
                    self.dispatch(action.to_command());
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        if let Some(report) = self.resize.poll(engine) {
            if report.resized {
                let _ = self.scheduler.request_once(window.as_ref());
            }
        }

        let flow = self
            .resize
            .next_deadline()
            .map_or(ControlFlow::Wait, ControlFlow::WaitUntil);
        event_loop.set_control_flow(flow);
    }
}
