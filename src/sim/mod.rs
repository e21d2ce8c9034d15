//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - Wall-clock delta supplied by the host, never read here
//! - Randomness only through an injected source
//! - Stable object order (spawn order)
//! - Feedback reported as returned events, not side effects

pub mod collision;
pub mod lane;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionOutcome, detect};
pub use lane::{Direction, Lane, LaneChange, transition};
pub use spawn::{RandomSource, generate_batch, should_spawn};
pub use state::{
    DecorationVariant, EntityIds, GameEvent, GamePhase, GameState, Hazard, ObjectKind,
    ObjectView, Roadside, Snapshot, SummarySlot, WorldObject,
};
pub use tick::{TickInput, tick};
