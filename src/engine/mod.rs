//! The frame-driven engine: GPU context, renderer, scene, and camera
//! wired together behind one `frame` call.

pub mod command;
mod state;

use web_time::Instant;

use self::command::Command;
use self::state::SceneState;
use crate::camera::Camera;
use crate::error::OrbitError;
use crate::frame::FrameTick;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::scene::demo::DemoHandles;
use crate::scene::{NodeId, Scene, SceneMutator};
use crate::util::frame_timing::FrameTiming;
use crate::viewport::sync::{SyncReport, ViewportSync};
use crate::viewport::{ViewportHost, ViewportState};

/// What a frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The scene was drawn and presented.
    Rendered,
    /// Nothing was drawn (degenerate viewport).
    Skipped,
}

/// Owns the GPU context, renderer, and scene state, and runs one frame at a
/// time.
///
/// The host (window loop or browser) drives it: viewport changes go through
/// [`apply_viewport`](Self::apply_viewport), input through
/// [`execute`](Self::execute), and each scheduled frame through
/// [`frame`](Self::frame).
pub struct SceneEngine {
    context: RenderContext,
    renderer: SceneRenderer,
    state: SceneState,
    viewport: ViewportSync,
    frame_timing: FrameTiming,
}

impl SceneEngine {
    /// Create the GPU context for `window`, build the demo scene, and sync
    /// the camera to `viewport` before the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::Gpu`] if no adapter/device or surface is
    /// available.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: ViewportState,
        mut options: Options,
    ) -> Result<Self, OrbitError> {
        options.keybindings.rebuild_reverse_map();
        let context = RenderContext::new(window, viewport).await?;
        let renderer =
            SceneRenderer::new(&context, options.display.clear_color);
        let sync = ViewportSync::new(options.display.max_pixel_ratio);
        let state = SceneState::new(options)?;

        let mut engine = Self {
            context,
            renderer,
            state,
            viewport: sync,
            frame_timing: FrameTiming::default(),
        };
        let report = engine.apply_viewport(viewport);
        log::info!(
            "engine ready: {}x{} @{:.2} ({:?}), aspect {:?}",
            viewport.width,
            viewport.height,
            engine.context.pixel_ratio(),
            engine.context.format(),
            report.aspect,
        );
        Ok(engine)
    }

    /// Measure `host` with this engine's pixel-ratio cap.
    #[must_use]
    pub fn measure<H: ViewportHost + ?Sized>(&self, host: &H) -> ViewportState {
        self.viewport.sizer().measure(host)
    }

    /// Resize the surface to `state` and keep the camera aspect in step.
    pub fn apply_viewport(&mut self, state: ViewportState) -> SyncReport {
        self.viewport
            .apply(&mut self.context, &mut self.state.camera, state)
    }

    /// The viewport the surface currently matches.
    #[must_use]
    pub fn viewport(&self) -> Option<ViewportState> {
        self.viewport.current()
    }

    /// Update controls and scene for `tick`, then draw.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::Surface`] if the swapchain frame cannot be
    /// acquired; [`OrbitError::is_surface_lost`] tells whether a
    /// reconfigure will help.
    pub fn frame(&mut self, tick: &FrameTick) -> Result<FrameStatus, OrbitError> {
        let _ = self.state.update(tick);

        if self.viewport.current().is_none_or(|v| v.is_degenerate()) {
            log::debug!("frame {}: degenerate viewport, not drawing", tick.index);
            return Ok(FrameStatus::Skipped);
        }

        let _ = self.state.camera.refresh_projection();
        self.renderer
            .render(&self.context, &self.state.scene, &self.state.camera)?;
        self.frame_timing.record_frame_at(Instant::now());
        Ok(FrameStatus::Rendered)
    }

    /// Whether another frame is needed to finish damped camera motion.
    ///
    /// Hosts that render on demand should request one more frame after
    /// each frame while this holds.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.state.is_settling()
    }

    /// Reconfigure the surface at its current size (after `Lost` or
    /// `Outdated`).
    pub fn reconfigure_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Apply an engine-level command. Returns `false` for commands the
    /// host must handle itself.
    pub fn execute(&mut self, command: Command) -> bool {
        self.state.execute(command)
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.state.options
    }

    /// Replace the options and apply every section to the live engine.
    pub fn set_options(&mut self, options: Options) {
        self.viewport
            .sizer_mut()
            .set_max_pixel_ratio(options.display.max_pixel_ratio);
        self.renderer.set_clear_color(options.display.clear_color);
        self.state.set_options(options);
    }

    /// Make the camera orbit `node`. Returns `false` if it does not exist.
    pub fn set_anchor(&mut self, node: NodeId) -> bool {
        self.state.set_anchor(node)
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    /// The scene graph.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    /// Mutable scene graph, for adding or removing nodes.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.state.scene
    }

    /// The per-frame mutator.
    pub fn mutator_mut(&mut self) -> &mut SceneMutator {
        &mut self.state.mutator
    }

    /// Handles to the demo nodes.
    #[must_use]
    pub fn handles(&self) -> &DemoHandles {
        &self.state.handles
    }

    /// The GPU context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// The fps, once per report interval.
    pub fn fps_report(&mut self, now: Instant) -> Option<f32> {
        self.frame_timing
            .report_due(now)
            .then(|| self.frame_timing.fps())
    }
}
