//! Runtime options with TOML preset support.
//!
//! Camera, display, animation, scene, and keybinding settings live here.
//! Options serialize to/from TOML presets; the UI-facing subset is
//! described by a JSON schema.

mod animation;
mod camera;
mod display;
mod keybindings;
mod scene;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
pub use scene::SceneOptions;
use serde::{Deserialize, Serialize};

use crate::error::OrbitError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Surface sizing and presentation.
    pub display: DisplayOptions,
    /// Camera projection and orbit controls.
    pub camera: CameraOptions,
    /// Group spin.
    pub animation: AnimationOptions,
    /// Demo scene parameters.
    pub scene: SceneOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::OptionsParse`] on malformed TOML or a field of
    /// the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, OrbitError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| OrbitError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::Io`] if the file cannot be read, or
    /// [`OrbitError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, OrbitError> {
        let content = std::fs::read_to_string(path).map_err(OrbitError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::Io`] if the file or its directory cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), OrbitError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OrbitError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(OrbitError::Io)?;
        }
        std::fs::write(path, content).map_err(OrbitError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;
    use crate::scene::SpinMode;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[display]
resize_debounce_ms = 100

[animation]
spin_mode = "incremental"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.display.resize_debounce_ms, 100);
        assert_eq!(opts.animation.spin_mode, SpinMode::Incremental);
        // Everything else should be default
        assert_eq!(opts.display.max_pixel_ratio, 2.0);
        assert_eq!(opts.camera.fovy, 75.0);
        assert!(opts.scene.show_group);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml_str("[display\n").unwrap_err();
        assert!(matches!(err, OrbitError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyW"),
            Some(KeyAction::ToggleWireframe)
        );
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(KeyAction::ToggleFrameLoop)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_rebuild_reverse_map() {
        let toml_str = r#"
[keybindings.bindings]
ToggleWireframe = "KeyX"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyX"),
            Some(KeyAction::ToggleWireframe)
        );
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn save_then_load_preset() {
        let dir = std::env::temp_dir()
            .join(format!("orbitview-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.scene.cube_height = 1.5;
        opts.save(&dir.join("raised.toml")).unwrap();

        let loaded = Options::load(&dir.join("raised.toml")).unwrap();
        assert_eq!(loaded.scene.cube_height, 1.5);
        assert_eq!(Options::list_presets(&dir), vec!["raised".to_owned()]);

        let missing = Options::load(&dir.join("missing.toml")).unwrap_err();
        assert!(matches!(missing, OrbitError::Io(_)));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("display"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("scene"));
        assert!(!props.contains_key("keybindings"));

        let scene = &props["scene"]["properties"];
        assert_eq!(scene["cube_height"]["minimum"], -3.0);
        assert_eq!(scene["cube_height"]["maximum"], 3.0);
        assert_eq!(scene["cube_height"]["step"], 0.1);

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("eye").is_none());
    }
}
