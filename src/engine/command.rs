//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, mouse
//! gesture, or programmatic call, is represented as a `Command`. Consumers
//! construct commands and pass them to
//! [`SceneEngine::execute`](super::SceneEngine::execute).

use glam::Vec2;

/// A discrete or parameterized operation.
///
/// ```ignore
/// engine.execute(Command::ToggleWireframe);
/// engine.execute(Command::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    // ── Camera ──────────────────────────────────────────────────────
    /// Return the camera to its initial view.
    RecenterCamera,

    /// Rotate the camera by `delta` pixels of mouse movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera by `delta` pixels of mouse movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    // ── Scene ───────────────────────────────────────────────────────
    /// Toggle wireframe drawing of the main cube.
    ToggleWireframe,

    /// Show or hide the axes helper.
    ToggleAxes,

    /// Show or hide the main cube.
    ToggleCubeVisibility,

    /// Show or hide the spinning cube group.
    ToggleGroup,

    /// Pause or resume the group spin.
    ToggleSpin,

    /// Move the main cube vertically (clamped to the allowed range).
    SetCubeHeight {
        /// New height.
        y: f32,
    },

    // ── Host ────────────────────────────────────────────────────────
    /// Enter or leave fullscreen.
    ToggleFullscreen,

    /// Start or stop the continuous frame loop.
    ToggleFrameLoop,
}

impl Command {
    /// Whether the command acts on the window or loop rather than the
    /// engine. The engine ignores these; the host handles them.
    #[must_use]
    pub fn is_host_command(&self) -> bool {
        matches!(self, Self::ToggleFullscreen | Self::ToggleFrameLoop)
    }
}
