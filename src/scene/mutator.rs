//! Time-driven transform updates applied once per frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Axis, NodeId, Scene};
use crate::frame::FrameTick;

/// How a [`Spin`] turns elapsed time into an angle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    /// `angle = elapsed * rate`. Independent of how many frames ran.
    #[default]
    Absolute,
    /// `angle += delta * rate` each frame. Accumulates rounding error and
    /// depends on frame pacing.
    Incremental,
}

/// Continuous rotation of one node about one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Node to rotate.
    pub node: NodeId,
    /// Rotation axis.
    pub axis: Axis,
    /// Radians per second.
    pub rate: f32,
    /// Absolute or incremental update.
    pub mode: SpinMode,
}

impl Spin {
    #[allow(clippy::cast_possible_truncation)]
    fn angle_for(&self, tick: &FrameTick, current: f32) -> f32 {
        let rate = f64::from(self.rate);
        match self.mode {
            SpinMode::Absolute => (tick.elapsed_secs() * rate) as f32,
            SpinMode::Incremental => {
                current + (tick.delta_secs() * rate) as f32
            }
        }
    }
}

/// Applies [`Spin`]s to a scene once per frame.
#[derive(Debug, Clone, Default)]
pub struct SceneMutator {
    spins: Vec<Spin>,
    paused: bool,
}

impl SceneMutator {
    /// Mutator with no spins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spin.
    pub fn add_spin(&mut self, spin: Spin) {
        self.spins.push(spin);
    }

    /// Drop every spin targeting `node`. Returns how many were removed.
    pub fn remove_spins_for(&mut self, node: NodeId) -> usize {
        let before = self.spins.len();
        self.spins.retain(|s| s.node != node);
        before - self.spins.len()
    }

    /// Registered spins.
    #[must_use]
    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Mutable access to registered spins (rate and mode changes).
    pub fn spins_mut(&mut self) -> &mut [Spin] {
        &mut self.spins
    }

    /// Whether updates are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend or resume updates. Absolute spins jump to the current
    /// elapsed angle on resume.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Write this frame's angles into `scene`. Spins whose node no longer
    /// exists are skipped. Returns the number of nodes written.
    pub fn apply(&self, scene: &mut Scene, tick: &FrameTick) -> usize {
        if self.paused {
            return 0;
        }
        let mut written = 0;
        for spin in &self.spins {
            let Some(node) = scene.node_mut(spin.node) else {
                continue;
            };
            let angle = node.transform.rotation_mut(spin.axis);
            *angle = spin.angle_for(tick, *angle);
            written += 1;
        }
        written
    }
}
