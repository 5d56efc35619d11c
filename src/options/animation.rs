use std::f32::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::{Axis, SpinMode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Spin applied to the cube group.
pub struct AnimationOptions {
    /// Whether the group spins.
    #[schemars(title = "Spin")]
    pub spin_enabled: bool,
    /// Spin rate in radians per second.
    #[schemars(title = "Spin Rate", range(min = 0.0, max = 12.6), extend("step" = 0.1))]
    pub spin_rate: f32,
    /// Spin axis.
    #[schemars(title = "Spin Axis")]
    pub spin_axis: Axis,
    /// Absolute (elapsed-time) or incremental (per-frame delta) spin.
    #[schemars(title = "Spin Mode")]
    pub spin_mode: SpinMode,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            spin_enabled: true,
            spin_rate: PI,
            spin_axis: Axis::Y,
            spin_mode: SpinMode::Absolute,
        }
    }
}
