use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

/// Which key triggers each [`KeyAction`].
///
/// Keys are `winit::keyboard::KeyCode` debug names. Binding a key that is
/// already in use moves it to the new action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeybindingOptions {
    /// Action to key name, e.g. `ToggleSpin = "KeyR"`.
    pub bindings: BTreeMap<KeyAction, String>,
    #[serde(skip)]
    by_key: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let mut options = Self {
            bindings: BTreeMap::from([
                (KeyAction::RecenterCamera, "KeyQ".to_owned()),
                (KeyAction::ToggleWireframe, "KeyW".to_owned()),
                (KeyAction::ToggleAxes, "KeyA".to_owned()),
                (KeyAction::ToggleCubeVisibility, "KeyV".to_owned()),
                (KeyAction::ToggleGroup, "KeyG".to_owned()),
                (KeyAction::ToggleSpin, "KeyR".to_owned()),
                (KeyAction::ToggleFullscreen, "KeyF".to_owned()),
                (KeyAction::ToggleFrameLoop, "Space".to_owned()),
            ]),
            by_key: HashMap::new(),
        };
        options.rebuild_reverse_map();
        options
    }
}

impl KeybindingOptions {
    /// Recompute key lookups from `bindings`. Needed after deserializing or
    /// editing `bindings` directly.
    pub fn rebuild_reverse_map(&mut self) {
        self.by_key = self
            .bindings
            .iter()
            .map(|(action, key)| (key.clone(), *action))
            .collect();
    }

    /// Bind `action` to `key`, unbinding whatever action held `key`.
    pub fn bind(&mut self, action: KeyAction, key: impl Into<String>) {
        let key = key.into();
        self.bindings.retain(|_, bound| *bound != key);
        let _ = self.bindings.insert(action, key);
        self.rebuild_reverse_map();
    }

    /// The action bound to `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.by_key.get(key).copied()
    }

    /// The key bound to `action`.
    #[must_use]
    pub fn key_for(&self, action: KeyAction) -> Option<&str> {
        self.bindings.get(&action).map(String::as_str)
    }
}
