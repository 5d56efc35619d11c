use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Surface sizing and presentation settings.
pub struct DisplayOptions {
    /// Upper bound for the device pixel ratio used for the backing buffer.
    #[schemars(title = "Max Pixel Ratio", range(min = 0.5, max = 4.0), extend("step" = 0.25))]
    pub max_pixel_ratio: f64,
    /// Quiet period after the last resize event before the surface and
    /// camera are updated.
    #[schemars(title = "Resize Debounce (ms)", range(min = 0, max = 2000), extend("step" = 10))]
    pub resize_debounce_ms: u64,
    /// Background color (linear RGB).
    #[schemars(skip)]
    pub clear_color: [f32; 3],
    /// Append the smoothed frame rate to the window title.
    #[schemars(title = "FPS in Title")]
    pub show_fps_in_title: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            resize_debounce_ms: 250,
            clear_color: [0.0, 0.0, 0.0],
            show_fps_in_title: true,
        }
    }
}

impl DisplayOptions {
    /// The resize debounce window.
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
