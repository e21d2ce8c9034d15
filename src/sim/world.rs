//! World scrolling
//!
//! Objects are plain values; each step consumes the collection and returns a
//! new one so nothing else can hold a stale alias into it.

use super::state::WorldObject;

/// Move every object `distance` units toward the player
pub fn advance(objects: Vec<WorldObject>, distance: f32) -> Vec<WorldObject> {
    debug_assert!(distance >= 0.0, "negative advance distance: {distance}");
    let distance = clamp_distance(distance);
    objects
        .into_iter()
        .map(|o| WorldObject {
            depth: o.depth + distance,
            ..o
        })
        .collect()
}

/// Drop objects that have passed the near boundary
pub fn prune(objects: Vec<WorldObject>, near_boundary: f32) -> Vec<WorldObject> {
    objects
        .into_iter()
        .filter(|o| o.depth <= near_boundary)
        .collect()
}

/// Drop objects resolved on an earlier tick
pub fn sweep_consumed(objects: Vec<WorldObject>) -> Vec<WorldObject> {
    objects.into_iter().filter(|o| !o.consumed).collect()
}

/// Depth of the object furthest from the player (closest to the spawn boundary)
pub fn frontier_depth(objects: &[WorldObject]) -> Option<f32> {
    objects.iter().map(|o| o.depth).reduce(f32::min)
}

/// Objects still in play
pub fn visible(objects: &[WorldObject]) -> impl Iterator<Item = &WorldObject> {
    objects.iter().filter(|o| !o.consumed)
}

/// Release-build guard for malformed distances (negative, NaN, infinite)
pub(crate) fn clamp_distance(distance: f32) -> f32 {
    if distance.is_finite() {
        distance.max(0.0)
    } else {
        0.0
    }
}
