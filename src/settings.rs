//! Game settings and preferences
//!
//! Persisted as JSON, separately from the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound: bool,
    /// Background music on/off
    pub music: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Visual Effects ===
    /// Explosion debris
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// Ship stroke colour (CSS colour string)
    pub ship_color: String,

    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            music: true,
            music_volume: 0.5,
            particles: true,
            show_fps: false,
            ship_color: "#4ecdc4".to_string(),
            difficulty: Difficulty::Normal,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "asteroid_rush_settings";

    /// Set music volume, clamped to 0.0 - 1.0
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        if self.music { self.music_volume * 0.3 } else { 0.0 }
    }

    /// Load settings, falling back to defaults on any failure.
    ///
    /// Stored fields override defaults individually, so settings written by
    /// an older build still load.
    pub fn load(store: &impl Storage) -> Self {
        match persistence::load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                settings.set_music_volume(settings.music_volume);
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut impl Storage) {
        match persistence::save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}
