//! Lane-based collision detection
//!
//! A hit needs the same lane and a depth within the proximity radius of the
//! player. Decorations and consumed objects never hit. When a hazard and a
//! heart both hit on the same tick, the hazard wins.

use super::lane::Lane;
use super::state::{Hazard, ObjectKind, WorldObject};

/// Authoritative result of one collision pass
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionOutcome {
    /// Nothing touched the player
    Clear,
    /// Hearts touched the player (in world order)
    Collect { ids: Vec<u32> },
    /// A hazard touched the player; ends the run
    Crash { id: u32, label: Hazard },
}

/// Check a single object against the player
#[inline]
pub fn is_hit(object: &WorldObject, player_lane: Lane, player_depth: f32, radius: f32) -> bool {
    object.is_collidable()
        && object.lane() == Some(player_lane)
        && (object.depth - player_depth).abs() < radius
}

/// Evaluate every object against the player's lane
pub fn detect(
    objects: &[WorldObject],
    player_lane: Lane,
    player_depth: f32,
    radius: f32,
) -> CollisionOutcome {
    let hits = objects
        .iter()
        .filter(|o| is_hit(o, player_lane, player_depth, radius));

    let mut crash: Option<&WorldObject> = None;
    let mut collected = Vec::new();
    for object in hits {
        match object.kind {
            ObjectKind::Obstacle { .. } => {
                // Nearest hazard is the one the player ran into
                let nearer = crash.is_none_or(|c| {
                    (object.depth - player_depth).abs() < (c.depth - player_depth).abs()
                });
                if nearer {
                    crash = Some(object);
                }
            }
            ObjectKind::Collectible { .. } => collected.push(object.id),
            ObjectKind::Decoration { .. } => {}
        }
    }

    if let Some(object) = crash {
        if let Some(label) = object.label() {
            return CollisionOutcome::Crash {
                id: object.id,
                label,
            };
        }
    }
    if collected.is_empty() {
        CollisionOutcome::Clear
    } else {
        CollisionOutcome::Collect { ids: collected }
    }
}
