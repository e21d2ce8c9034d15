//! Heart Dash - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Simulation (lanes, spawning, world scrolling, collisions, session lifecycle)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (audio)
//! - `audio`: Feedback-to-sound mapping behind an injected backend
//! - `narrative`: Post-game summary request/response port
//! - `platform`: Browser host bindings

pub mod audio;
pub mod narrative;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame delta used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Leftmost lane index
    pub const LANE_MIN: i8 = -1;
    /// Rightmost lane index
    pub const LANE_MAX: i8 = 1;
    /// World-space width of one lane (presentation only)
    pub const LANE_WIDTH: f32 = 2.0;
    /// World-space x offset of roadside decorations (outside the lane band)
    pub const ROADSIDE_OFFSET: f32 = 4.5;

    /// Depth at which the player stands
    pub const PLAYER_DEPTH: f32 = 0.0;
    /// Far depth where new batches appear
    pub const SPAWN_BOUNDARY: f32 = -60.0;
    /// Depth past the player where objects leave the playfield
    pub const NEAR_BOUNDARY: f32 = 10.0;
    /// Gap the frontier must open past the spawn boundary before the next batch
    pub const SPAWN_THRESHOLD: f32 = 12.0;
    /// Hit distance along the travel axis
    pub const PROXIMITY_RADIUS: f32 = 1.0;

    /// Run speed at start (depth units per second)
    pub const INITIAL_SPEED: f32 = 15.0;
    /// Speed gained every running tick
    pub const SPEED_INCREMENT: f32 = 0.002;
    /// Score per depth unit travelled
    pub const SCORE_PER_UNIT: f64 = 1.0;
    /// Distance between footstep signals
    pub const STEP_INTERVAL: f32 = 2.5;

    /// Spawn probabilities
    pub const DECORATION_CHANCE: f32 = 0.7;
    pub const LAMP_CHANCE: f32 = 0.3;
    pub const COLLECTIBLE_CHANCE: f32 = 0.4;
}
