//! Player preferences
//!
//! Supplied by the host (e.g. from its own storage) as JSON; this crate
//! never persists them.

use serde::{Deserialize, Serialize};

/// Audio/accessibility settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,
    /// Footstep ticks are the noisiest effect; allow turning just those off
    pub footsteps: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            footsteps: true,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Parse settings JSON, falling back to defaults if it is unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings.clamped()
            }
            Err(e) => {
                log::warn!("Bad settings JSON ({e}); using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Volumes forced into [0, 1]
    pub fn clamped(&self) -> Self {
        Self {
            master_volume: volume(self.master_volume),
            sfx_volume: volume(self.sfx_volume),
            ..self.clone()
        }
    }
}

fn volume(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
