//! Display settings and preferences
//!
//! Persisted in LocalStorage. Game rules are not configurable; only how the
//! court is drawn and the two opt-in hardening fixes.

use serde::{Deserialize, Serialize};

use crate::sim::Hardening;

/// Colors, font and net pattern used by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Court background (CSS color)
    pub background: String,
    /// Paddles, ball, net and scores (CSS color)
    pub foreground: String,
    /// CSS font for the scores
    pub score_font: String,
    /// Net stroke width
    pub net_line_width: f32,
    /// Length of each net dash
    pub net_dash: f32,
    /// Gap between net dashes
    pub net_gap: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "black".to_string(),
            foreground: "white".to_string(),
            score_font: "45px Century Gothic".to_string(),
            net_line_width: 3.0,
            net_dash: 25.0,
            net_gap: 10.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub hardening: Hardening,
    /// Register the offline worker on startup
    pub offline_worker: OfflineWorker,
}

/// Offline worker registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineWorker {
    pub enabled: bool,
    /// Script URL passed to `navigator.serviceWorker.register`
    pub script_url: String,
}

impl Default for OfflineWorker {
    fn default() -> Self {
        Self {
            enabled: true,
            script_url: "./serviceWorker.js".to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "canvas_pong_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Settings for the stored JSON, plus whether the stored copy should be
    /// rewritten: nothing stored, unparseable, or not in the current shape
    /// (fields added or removed since it was written).
    pub fn resolve(stored: Option<&str>) -> (Self, bool) {
        let Some(json) = stored else {
            return (Self::default(), true);
        };
        match Self::from_json(json) {
            Ok(settings) => {
                let current = serde_json::to_value(&settings).ok();
                let stored = serde_json::from_str::<serde_json::Value>(json).ok();
                let stale = current.is_none() || current != stored;
                (settings, stale)
            }
            Err(e) => {
                log::warn!("Ignoring invalid stored settings: {}", e);
                (Self::default(), true)
            }
        }
    }

    /// Load settings, writing them back when the stored copy is missing or
    /// out of date so every field shows up for editing
    pub fn load() -> Self {
        let stored = Self::read_stored();
        let (settings, stale) = Self::resolve(stored.as_deref());
        if stored.is_some() && !stale {
            log::info!("Loaded settings from LocalStorage");
        } else {
            log::info!("Using default settings");
        }
        if stale {
            settings.save();
        }
        settings
    }

    #[cfg(target_arch = "wasm32")]
    fn read_stored() -> Option<String> {
        web_sys::window()?
            .local_storage()
            .ok()??
            .get_item(Self::STORAGE_KEY)
            .ok()?
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Failed to save settings: {:?}", e),
                },
                Err(e) => log::warn!("Failed to serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    fn read_stored() -> Option<String> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
