//! Player settings and preferences
//!
//! Persisted separately from the best score: as JSON on disk for native
//! hosts, in LocalStorage for the browser build.

use serde::{Deserialize, Serialize};

use crate::sim::ramp;
use crate::tuning::Tuning;

/// Speed-line opacity below this is not worth drawing
const SPEED_LINE_CUTOFF: f32 = 0.02;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Footstep ticks while running
    pub footsteps: bool,

    // === Visual Effects ===
    /// Speed-line overlay that intensifies with difficulty
    pub speed_lines: bool,
    /// Screen shake on collision
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no speed lines)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            footsteps: true,

            speed_lines: true,
            screen_shake: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective speed lines (respects reduced_motion)
    pub fn effective_speed_lines(&self) -> bool {
        self.speed_lines && !self.reduced_motion
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Speed-line opacity for the given difficulty progress, or 0 when the
    /// overlay is disabled or no brighter than the cutoff
    pub fn speed_line_alpha(&self, progress: f32, tuning: &Tuning) -> f32 {
        if !self.effective_speed_lines() {
            return 0.0;
        }
        let alpha = ramp::speed_line_alpha(progress, tuning);
        if alpha <= SPEED_LINE_CUTOFF { 0.0 } else { alpha }
    }

    /// Clamp volumes into range after loading untrusted data
    pub fn sanitized(mut self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 };
        self.master_volume = clamp(self.master_volume);
        self.sfx_volume = clamp(self.sfx_volume);
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.sanitized();
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(
        path: &std::path::Path,
    ) -> Result<Self, crate::persistence::PersistError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings: Settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings.sanitized())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Save settings as pretty JSON, creating parent directories
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::persistence::PersistError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
