//! Player preferences
//!
//! The sound toggle is the only durable state in the game. It is persisted
//! under a fixed key as the JSON literal `true`/`false`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key/value backing store for preferences
pub trait PreferenceStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl PreferenceStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write preference {}", key);
            }
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Background music on/off (feedback tones always play)
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "soundEnabled";

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &impl PreferenceStore) -> Self {
        if let Some(raw) = store.get_item(Self::STORAGE_KEY) {
            if let Ok(sound_enabled) = serde_json::from_str::<bool>(&raw) {
                log::info!("Loaded sound preference: {}", sound_enabled);
                return Self { sound_enabled };
            }
            log::warn!("Ignoring unreadable sound preference {:?}", raw);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Persist settings
    pub fn save(&self, store: &mut impl PreferenceStore) {
        match serde_json::to_string(&self.sound_enabled) {
            Ok(json) => {
                store.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }

    /// Flip the sound preference and persist it. Returns the new value.
    pub fn toggle_sound(&mut self, store: &mut impl PreferenceStore) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.save(store);
        self.sound_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let store = MemoryStore::new();
        assert!(Settings::load(&store).sound_enabled);
    }

    #[test]
    fn test_toggle_persists() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        assert!(!settings.toggle_sound(&mut store));
        assert_eq!(
            store.get_item(Settings::STORAGE_KEY).as_deref(),
            Some("false")
        );
        assert!(!Settings::load(&store).sound_enabled);

        assert!(settings.toggle_sound(&mut store));
        assert!(Settings::load(&store).sound_enabled);
    }

    #[test]
    fn test_garbage_value_falls_back() {
        let mut store = MemoryStore::new();
        store.set_item(Settings::STORAGE_KEY, "maybe");
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
