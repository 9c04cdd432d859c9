//! Game settings
//!
//! Read once at startup: from the page query string in the browser, from an
//! optional JSON file plus environment on native.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DEAD_ZONE, DEFAULT_MAX_DELTA_FACTOR};
use crate::error::SettingsError;

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Diagnostic overlay: frame rate, bounding boxes, enemy health.
    /// Never affects the simulation.
    pub debug: bool,
    /// Upper clamp for the per-frame delta factor (<= 0 disables)
    pub max_delta_factor: f32,
    /// Gamepad left-stick dead zone (0-1)
    pub gamepad_dead_zone: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            max_delta_factor: DEFAULT_MAX_DELTA_FACTOR,
            gamepad_dead_zone: DEFAULT_DEAD_ZONE,
        }
    }
}

impl Settings {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Apply `?debug`, `?debug=0`, `?dead_zone=0.3`, `?max_delta=3` style
    /// parameters on top of `self`. Unknown keys and unparsable values are ignored.
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (pair, None),
            };
            match key {
                "debug" => self.debug = !matches!(value, Some("0") | Some("false")),
                "dead_zone" => {
                    if let Some(v) = value.and_then(|v| v.parse().ok()) {
                        self.gamepad_dead_zone = v;
                    }
                }
                "max_delta" => {
                    if let Some(v) = value.and_then(|v| v.parse().ok()) {
                        self.max_delta_factor = v;
                    }
                }
                _ => {}
            }
        }
        self.sanitized()
    }

    /// Clamp values into their meaningful ranges; non-finite values fall
    /// back to defaults
    fn sanitized(mut self) -> Self {
        if !self.gamepad_dead_zone.is_finite() {
            log::warn!("Ignoring non-finite dead zone {}", self.gamepad_dead_zone);
            self.gamepad_dead_zone = DEFAULT_DEAD_ZONE;
        }
        self.gamepad_dead_zone = self.gamepad_dead_zone.clamp(0.0, 0.95);
        if self.max_delta_factor.is_nan() {
            log::warn!("Ignoring NaN delta clamp");
            self.max_delta_factor = DEFAULT_MAX_DELTA_FACTOR;
        }
        self
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = Self::default().with_query(&query);
        log::info!("Settings: {:?}", settings);
        settings
    }

    /// Load settings from an optional JSON file and `WAVE_ARENA_DEBUG` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Self {
        let mut settings = match path {
            Some(path) => match std::fs::read_to_string(path)
                .map_err(SettingsError::from)
                .and_then(|json| Self::from_json(&json))
            {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("{}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        if let Ok(flag) = std::env::var("WAVE_ARENA_DEBUG") {
            settings.debug = !matches!(flag.as_str(), "" | "0" | "false");
        }
        log::info!("Settings: {:?}", settings);
        settings
    }
}
