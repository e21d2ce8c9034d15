//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a run can be retuned from
//! JSON without a rebuild. Values are sanitized before the simulation sees them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Simulation balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Depth at which the player stands
    pub player_depth: f32,
    /// Far depth where new objects are created
    pub spawn_boundary: f32,
    /// Depth past the player where objects are removed
    pub near_boundary: f32,
    /// Frontier gap required before the next batch spawns
    pub spawn_threshold: f32,
    /// Hit distance along the travel axis
    pub proximity_radius: f32,

    /// Run speed at start (depth units per second)
    pub initial_speed: f32,
    /// Speed gained every running tick
    pub speed_increment: f32,
    /// Score per depth unit travelled
    pub score_per_unit: f64,
    /// Distance between footstep signals (0 disables)
    pub step_interval: f32,

    /// Chance a batch carries a roadside decoration
    pub decoration_chance: f32,
    /// Chance a decoration is a lamp rather than a tree
    pub lamp_chance: f32,
    /// Chance the gameplay object is a heart rather than a hazard
    pub collectible_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_depth: PLAYER_DEPTH,
            spawn_boundary: SPAWN_BOUNDARY,
            near_boundary: NEAR_BOUNDARY,
            spawn_threshold: SPAWN_THRESHOLD,
            proximity_radius: PROXIMITY_RADIUS,

            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            score_per_unit: SCORE_PER_UNIT,
            step_interval: STEP_INTERVAL,

            decoration_chance: DECORATION_CHANCE,
            lamp_chance: LAMP_CHANCE,
            collectible_chance: COLLECTIBLE_CHANCE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject layouts the simulation cannot run on
    pub fn validate(&self) -> Result<(), TuningError> {
        let all_finite = [
            self.player_depth,
            self.spawn_boundary,
            self.near_boundary,
            self.spawn_threshold,
            self.proximity_radius,
            self.initial_speed,
            self.speed_increment,
            self.step_interval,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite || !self.score_per_unit.is_finite() {
            return Err(TuningError::Invalid("non-finite value".into()));
        }
        if !(self.spawn_boundary < self.player_depth && self.player_depth < self.near_boundary) {
            return Err(TuningError::Invalid(format!(
                "boundaries out of order: spawn {} / player {} / near {}",
                self.spawn_boundary, self.player_depth, self.near_boundary
            )));
        }
        if self.speed_increment < MIN_SPEED_INCREMENT {
            return Err(TuningError::Invalid(format!(
                "speed_increment {} below {MIN_SPEED_INCREMENT}",
                self.speed_increment
            )));
        }
        Ok(())
    }

    /// Copy with every field forced into its usable range
    ///
    /// Boundary order is not repaired here; use `validate` for that.
    pub fn sanitized(&self) -> Self {
        Self {
            spawn_threshold: self.spawn_threshold.max(0.0),
            proximity_radius: self.proximity_radius.max(f32::EPSILON),
            initial_speed: self.initial_speed.max(0.0),
            speed_increment: ramp(self.speed_increment),
            score_per_unit: self.score_per_unit.max(0.0),
            step_interval: self.step_interval.max(0.0),
            decoration_chance: unit(self.decoration_chance),
            lamp_chance: unit(self.lamp_chance),
            collectible_chance: unit(self.collectible_chance),
            ..self.clone()
        }
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| TuningError::Invalid(format!("{}: {e}", path.display())))
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning.sanitized()
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }
}

/// Smallest per-tick speed gain that still registers at run speeds in f32
pub const MIN_SPEED_INCREMENT: f32 = 1e-4;

/// Keep the difficulty ramp alive: unusable increments take the default
fn ramp(increment: f32) -> f32 {
    if increment >= MIN_SPEED_INCREMENT && increment.is_finite() {
        increment
    } else {
        SPEED_INCREMENT
    }
}

/// Clamp a probability into [0, 1], mapping NaN to 0
fn unit(p: f32) -> f32 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
