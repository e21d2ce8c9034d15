//! Three-lane positional model
//!
//! Lanes are -1 (left), 0 (center), 1 (right). Every transition clamps, so
//! pushing against the edge is a no-op rather than an error.

use serde::{Deserialize, Serialize};

use crate::consts::{LANE_MAX, LANE_MIN};

/// Steering intent from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// A lane index, always within [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i8", into = "i8")]
pub struct Lane(i8);

impl Lane {
    pub const LEFT: Lane = Lane(LANE_MIN);
    pub const CENTER: Lane = Lane(0);
    pub const RIGHT: Lane = Lane(LANE_MAX);

    /// All lanes, left to right
    pub const ALL: [Lane; 3] = [Lane::LEFT, Lane::CENTER, Lane::RIGHT];

    /// Build a lane, clamping out-of-range indices
    pub fn new(index: i8) -> Self {
        Lane(index.clamp(LANE_MIN, LANE_MAX))
    }

    #[inline]
    pub fn index(self) -> i8 {
        self.0
    }

    /// Horizontal world offset of this lane's center
    #[inline]
    pub fn x_offset(self, lane_width: f32) -> f32 {
        self.0 as f32 * lane_width
    }
}

impl From<i8> for Lane {
    fn from(index: i8) -> Self {
        Lane::new(index)
    }
}

impl From<Lane> for i8 {
    fn from(lane: Lane) -> Self {
        lane.0
    }
}

/// Result of a lane transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneChange {
    pub lane: Lane,
    /// False when the request was absorbed by the edge
    pub changed: bool,
}

/// Move one lane in `direction`, clamped to the band
pub fn transition(current: Lane, direction: Direction) -> LaneChange {
    let lane = Lane::new(current.0.saturating_add(direction.delta()));
    LaneChange {
        lane,
        changed: lane != current,
    }
}
