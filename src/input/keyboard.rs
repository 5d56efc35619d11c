use serde::{Deserialize, Serialize};

use crate::engine::command::Command;

/// Actions that can be bound to keys.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format (`"KeyW"`,
/// `"Space"`), so TOML presets read:
/// ```toml
/// [keybindings.bindings]
/// ToggleWireframe = "KeyW"
/// ToggleFrameLoop = "Space"
/// ```
#[allow(missing_docs)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum KeyAction {
    RecenterCamera,
    ToggleWireframe,
    ToggleAxes,
    ToggleCubeVisibility,
    ToggleGroup,
    ToggleSpin,
    ToggleFullscreen,
    ToggleFrameLoop,
}

impl KeyAction {
    /// The parameterless command this action triggers.
    #[must_use]
    pub fn to_command(self) -> Command {
        match self {
            Self::RecenterCamera => Command::RecenterCamera,
            Self::ToggleWireframe => Command::ToggleWireframe,
            Self::ToggleAxes => Command::ToggleAxes,
            Self::ToggleCubeVisibility => Command::ToggleCubeVisibility,
            Self::ToggleGroup => Command::ToggleGroup,
            Self::ToggleSpin => Command::ToggleSpin,
            Self::ToggleFullscreen => Command::ToggleFullscreen,
            Self::ToggleFrameLoop => Command::ToggleFrameLoop,
        }
    }
}
