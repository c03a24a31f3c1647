//! Game settings and preferences
//!
//! Read once at startup. On the web build the page may embed a JSON object in
//! `<script id="keyma-settings" type="application/json">`; anything missing
//! falls back to the defaults below.

use serde::{Deserialize, Serialize};

/// Admin secret used when the page does not configure one
pub const DEFAULT_ADMIN_SECRET: &str = "keyma-admin";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Classroom tools ===
    /// Shared secret unlocking the level jump panel
    pub admin_secret: String,

    // === Determinism ===
    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            admin_secret: DEFAULT_ADMIN_SECRET.to_string(),

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.clamp_volumes();
        Ok(settings)
    }

    /// Parse settings, logging and falling back to defaults on bad input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Effective sound effect volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }

    /// Element id holding page-provided settings
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "keyma-settings";

    /// Load settings embedded in the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) => Self::from_json_or_default(&json),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native: read `KEYMA_SETTINGS` (a JSON string) from the environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var("KEYMA_SETTINGS") {
            Ok(json) => Self::from_json_or_default(&json),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"admin_secret": "open-sesame"}"#).unwrap();
        assert_eq!(settings.admin_secret, "open-sesame");
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_volumes_are_clamped() {
        let settings = Settings::from_json(r#"{"master_volume": 3.0, "sfx_volume": -1.0}"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert!(Settings::from_json("not json").is_err());
        assert_eq!(Settings::from_json_or_default("{"), Settings::default());
    }

    #[test]
    fn test_mute_zeroes_volume() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert!(Settings::default().effective_music_volume() > 0.0);
    }

    #[test]
    fn test_json_round_trip_keeps_seed() {
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        let back = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(back.seed, Some(42));
    }
}
