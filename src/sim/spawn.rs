//! Procedural batch spawning
//!
//! Each batch is one gameplay object (heart or hazard) in a random lane plus,
//! usually, a roadside decoration. A new batch is only allowed once the
//! furthest object has moved far enough from the spawn boundary.

use rand::Rng;

use super::lane::Lane;
use super::state::{DecorationVariant, EntityIds, Hazard, ObjectKind, Roadside, WorldObject};
use crate::tuning::Tuning;

/// Random decisions the spawner needs
///
/// Implemented for every `rand::Rng`; tests can script the sequence.
pub trait RandomSource {
    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool;
    /// Uniform index in `0..n`
    fn pick(&mut self, n: usize) -> usize;
}

impl<T: Rng + ?Sized> RandomSource for T {
    fn chance(&mut self, p: f32) -> bool {
        if !(p > 0.0) {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.random_bool(p as f64)
        }
    }

    fn pick(&mut self, n: usize) -> usize {
        if n <= 1 { 0 } else { self.random_range(0..n) }
    }
}

/// True when there is room at the spawn boundary for another batch
///
/// `frontier_depth` is the minimum depth among active objects, so a batch
/// only spawns once even the newest one has cleared `threshold`.
pub fn should_spawn(frontier_depth: Option<f32>, spawn_boundary: f32, threshold: f32) -> bool {
    match frontier_depth {
        None => true,
        Some(depth) => depth > spawn_boundary + threshold,
    }
}

/// Generate one batch at the spawn boundary
pub fn generate_batch<R: RandomSource + ?Sized>(
    rng: &mut R,
    ids: &mut EntityIds,
    tuning: &Tuning,
) -> Vec<WorldObject> {
    let depth = tuning.spawn_boundary;
    let mut batch = Vec::with_capacity(2);

    if rng.chance(tuning.decoration_chance) {
        let side = if rng.pick(2) == 0 {
            Roadside::Left
        } else {
            Roadside::Right
        };
        let variant = if rng.chance(tuning.lamp_chance) {
            DecorationVariant::Lamp
        } else {
            DecorationVariant::Tree
        };
        batch.push(WorldObject::new(
            ids.next(),
            depth,
            ObjectKind::Decoration { side, variant },
        ));
    }

    let collectible = rng.chance(tuning.collectible_chance);
    let lane = Lane::ALL[rng.pick(Lane::ALL.len())];
    let kind = if collectible {
        ObjectKind::Collectible { lane }
    } else {
        let label = Hazard::ALL[rng.pick(Hazard::ALL.len())];
        ObjectKind::Obstacle { lane, label }
    };
    batch.push(WorldObject::new(ids.next(), depth, kind));

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::VecDeque;

    /// Replays fixed answers in order
    #[derive(Default)]
    struct ScriptedRng {
        chances: VecDeque<bool>,
        picks: VecDeque<usize>,
    }

    impl ScriptedRng {
        fn new(chances: &[bool], picks: &[usize]) -> Self {
            Self {
                chances: chances.iter().copied().collect(),
                picks: picks.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for ScriptedRng {
        fn chance(&mut self, _p: f32) -> bool {
            self.chances.pop_front().unwrap_or(false)
        }

        fn pick(&mut self, n: usize) -> usize {
            self.picks.pop_front().unwrap_or(0) % n
        }
    }

    #[test]
    fn test_should_spawn_on_empty_world() {
        assert!(should_spawn(None, -60.0, 12.0));
    }

    #[test]
    fn test_should_spawn_waits_for_frontier() {
        assert!(!should_spawn(Some(-60.0), -60.0, 12.0));
        assert!(!should_spawn(Some(-48.0), -60.0, 12.0));
        assert!(should_spawn(Some(-47.9), -60.0, 12.0));
    }

    #[test]
    fn test_scripted_obstacle_with_lamp() {
        // decoration yes, right side, lamp yes; collectible no, right lane, Ego
        let mut rng = ScriptedRng::new(&[true, true, false], &[1, 2, 0]);
        let mut ids = EntityIds::default();
        let batch = generate_batch(&mut rng, &mut ids, &Tuning::default());

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch[0].kind,
            ObjectKind::Decoration {
                side: Roadside::Right,
                variant: DecorationVariant::Lamp,
            }
        );
        assert_eq!(
            batch[1].kind,
            ObjectKind::Obstacle {
                lane: Lane::RIGHT,
                label: Hazard::Ego,
            }
        );
        assert!(batch.iter().all(|o| o.depth == Tuning::default().spawn_boundary));
        assert_ne!(batch[0].id, batch[1].id);
    }

    #[test]
    fn test_scripted_heart_without_decoration() {
        let mut rng = ScriptedRng::new(&[false, true], &[0]);
        let mut ids = EntityIds::default();
        let batch = generate_batch(&mut rng, &mut ids, &Tuning::default());

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, ObjectKind::Collectible { lane: Lane::LEFT });
    }

    #[test]
    fn test_batch_always_has_one_gameplay_object() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut ids = EntityIds::default();
        let tuning = Tuning::default();
        for _ in 0..200 {
            let batch = generate_batch(&mut rng, &mut ids, &tuning);
            let gameplay = batch.iter().filter(|o| o.lane().is_some()).count();
            assert_eq!(gameplay, 1);
            assert!(batch.len() <= 2);
        }
    }

    #[test]
    fn test_seeded_batches_are_reproducible() {
        let tuning = Tuning::default();
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ids = EntityIds::default();
            (0..20)
                .flat_map(|_| generate_batch(&mut rng, &mut ids, &tuning))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_spawn_mix_roughly_matches_weights() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut ids = EntityIds::default();
        let tuning = Tuning::default();
        let (mut hearts, mut decorations) = (0, 0);
        let batches = 4000;
        for _ in 0..batches {
            for object in generate_batch(&mut rng, &mut ids, &tuning) {
                match object.kind {
                    ObjectKind::Collectible { .. } => hearts += 1,
                    ObjectKind::Decoration { .. } => decorations += 1,
                    ObjectKind::Obstacle { .. } => {}
                }
            }
        }
        let heart_rate = hearts as f32 / batches as f32;
        let deco_rate = decorations as f32 / batches as f32;
        assert!((heart_rate - 0.4).abs() < 0.05, "heart rate {heart_rate}");
        assert!((deco_rate - 0.7).abs() < 0.05, "decoration rate {deco_rate}");
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(!rng.chance(0.0));
        assert!(!rng.chance(f32::NAN));
        assert!(rng.chance(1.0));
        assert_eq!(rng.pick(1), 0);
        assert_eq!(rng.pick(0), 0);
    }
}
