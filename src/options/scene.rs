use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
/// Live-tweakable parameters of the demo scene.
pub struct SceneOptions {
    /// Vertical position of the main cube.
    #[schemars(title = "Cube Y", range(min = -3.0, max = 3.0), extend("step" = 0.1))]
    pub cube_height: f32,
    /// Whether the main cube is drawn.
    #[schemars(title = "Cube Visible")]
    pub cube_visible: bool,
    /// Draw the main cube as edges only.
    #[schemars(title = "Wireframe")]
    pub wireframe: bool,
    /// Whether the axes helper is drawn.
    #[schemars(title = "Show Axes")]
    pub show_axes: bool,
    /// Whether the spinning cube group is drawn.
    #[schemars(title = "Show Group")]
    pub show_group: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            cube_height: 0.0,
            cube_visible: true,
            wireframe: false,
            show_axes: true,
            show_group: true,
        }
    }
}

impl SceneOptions {
    /// Lowest allowed cube height.
    pub const MIN_CUBE_HEIGHT: f32 = -3.0;
    /// Highest allowed cube height.
    pub const MAX_CUBE_HEIGHT: f32 = 3.0;

    /// Cube height clamped to the allowed range.
    #[must_use]
    pub fn clamped_cube_height(&self) -> f32 {
        self.cube_height
            .clamp(Self::MIN_CUBE_HEIGHT, Self::MAX_CUBE_HEIGHT)
    }
}
