//! Player preferences
//!
//! Persisted separately from the high score, as JSON under one key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::SessionConfig;

/// Player preferences from the title screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start at half chaos and let it climb all the way
    pub streamer_mode: bool,
    /// Chaos slider (0.0 - 1.0)
    pub starting_chaos: f32,

    // === Accessibility ===
    /// Reduced motion (presentation skips shake and tilt)
    pub reduced_motion: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            streamer_mode: false,
            starting_chaos: 0.0,
            reduced_motion: false,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "not_the_player_settings";

    /// Session parameters these preferences ask for
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            starting_chaos: self.starting_chaos,
            streamer_mode: self.streamer_mode,
        }
    }

    /// Effective camera shake (respects reduced_motion)
    pub fn effective_camera_shake(&self) -> bool {
        !self.reduced_motion
    }

    /// Clamp sliders into range
    pub fn sanitized(mut self) -> Self {
        self.starting_chaos = if self.starting_chaos.is_finite() {
            self.starting_chaos.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            Self::default().master_volume
        };
        self
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not load settings: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::Corrupt {
            key: Self::STORAGE_KEY.to_string(),
            value: e.to_string(),
        })?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            streamer_mode: true,
            starting_chaos: 0.3,
            reduced_motion: true,
            master_volume: 0.5,
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"streamer_mode":true}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert!(settings.streamer_mode);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_garbage_and_broken_store_give_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
        assert_eq!(Settings::load(&MemoryStore::broken()), Settings::default());
    }

    #[test]
    fn test_out_of_range_sliders_are_clamped() {
        let mut store = MemoryStore::new();
        store
            .set(
                Settings::STORAGE_KEY,
                r#"{"starting_chaos":7.0,"master_volume":-1.0}"#,
            )
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.starting_chaos, 1.0);
        assert_eq!(settings.master_volume, 0.0);
    }

    #[test]
    fn test_session_config() {
        let settings = Settings {
            streamer_mode: true,
            starting_chaos: 0.2,
            ..Default::default()
        };
        let config = settings.session_config();
        assert!(config.streamer_mode);
        assert_eq!(config.effective_starting_chaos(), 0.5);
    }
}
