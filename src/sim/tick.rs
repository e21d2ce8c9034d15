//! Per-frame simulation tick
//!
//! Advances a running session by a wall-clock delta: scroll, score, resolve
//! collisions, spawn, prune. Outside `Running` a tick does nothing.

use std::mem;

use super::collision;
use super::lane::{self, Direction};
use super::spawn::{self, RandomSource};
use super::state::{GameEvent, GamePhase, GameState};
use super::world;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lane change request (already debounced by the input layer)
    pub steer: Option<Direction>,
    /// Start/restart (tap to play); ignored while running
    pub start: bool,
}

/// Advance the session by `dt` seconds, returning feedback signals
pub fn tick<R: RandomSource>(
    state: &mut GameState<R>,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.start && state.phase != GamePhase::Running {
        state.start();
    }
    if state.phase != GamePhase::Running {
        return events;
    }

    debug_assert!(dt >= 0.0, "negative tick delta: {dt}");
    let dt = world::clamp_distance(dt);

    state.time_ticks += 1;

    // Objects resolved last tick leave now
    state.objects = world::sweep_consumed(mem::take(&mut state.objects));

    if let Some(direction) = input.steer {
        let change = lane::transition(state.lane, direction);
        if change.changed {
            state.lane = change.lane;
            events.push(GameEvent::Move { lane: change.lane });
        }
    }

    // Scroll and score
    let distance = state.speed * dt;
    state.objects = world::advance(mem::take(&mut state.objects), distance);
    state.distance += distance;
    state.score += distance as f64 * state.tuning.score_per_unit;
    state.speed += state.tuning.speed_increment;

    if state.tuning.step_interval > 0.0 {
        // One step per interval covered, however long the frame was
        state.step_progress += distance;
        while state.step_progress >= state.tuning.step_interval {
            state.step_progress -= state.tuning.step_interval;
            events.push(GameEvent::Step);
        }
    }

    let outcome = collision::detect(
        &state.objects,
        state.lane,
        state.tuning.player_depth,
        state.tuning.proximity_radius,
    );
    state.apply_collision(outcome, &mut events);

    if state.phase == GamePhase::Running {
        let frontier = world::frontier_depth(&state.objects);
        if spawn::should_spawn(
            frontier,
            state.tuning.spawn_boundary,
            state.tuning.spawn_threshold,
        ) {
            state.spawn_batch();
        }
        state.objects = world::prune(mem::take(&mut state.objects), state.tuning.near_boundary);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::narrative::{FALLBACK_SUMMARY, NarrativeError};
    use crate::sim::lane::Lane;
    use crate::sim::state::{Hazard, ObjectKind, SummarySlot};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.0,
        );
        state
    }

    /// Delta that moves the world exactly `units` at the current speed
    fn dt_for(state: &GameState, units: f32) -> f32 {
        units / state.speed()
    }

    #[test]
    fn test_tick_idle_is_noop() {
        let mut state = GameState::new(1);
        let events = tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(events.is_empty());
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.time_ticks(), 0);
        assert!(state.objects().is_empty());
    }

    #[test]
    fn test_start_input_begins_run() {
        let state = started(1);
        assert!(state.is_running());
        let tuning = Tuning::default();
        assert_eq!(state.speed(), tuning.initial_speed + tuning.speed_increment);
    }

    #[test]
    fn test_steer_emits_move_only_on_change() {
        let mut state = started(3);
        let left = TickInput {
            steer: Some(Direction::Left),
            ..Default::default()
        };
        let events = tick(&mut state, &left, 0.0);
        assert!(events.contains(&GameEvent::Move { lane: Lane::LEFT }));

        let events = tick(&mut state, &left, 0.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Move { .. })));
        assert_eq!(state.lane(), Lane::LEFT);
    }

    #[test]
    fn test_obstacle_hit_ends_run() {
        let mut state = started(5);
        let id = state.insert_object(
            0.0,
            ObjectKind::Obstacle {
                lane: Lane::CENTER,
                label: Hazard::Ego,
            },
        );

        let events = tick(&mut state, &TickInput::default(), 0.0);

        assert!(state.is_game_over());
        assert_eq!(state.hit_history().last(), Some(&Hazard::Ego));
        let hit = state.objects().iter().find(|o| o.id == id).unwrap();
        assert!(hit.consumed);
        assert!(events.contains(&GameEvent::Hit {
            id,
            label: Hazard::Ego
        }));
        assert!(events.contains(&GameEvent::GameOver {
            generation: state.generation()
        }));
    }

    #[test]
    fn test_collectible_hit_adds_one_heart() {
        let mut state = started(5);
        let id = state.insert_object(0.0, ObjectKind::Collectible { lane: Lane::CENTER });

        let events = tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.hearts(), 1);
        assert!(state.is_running());
        assert!(!state.is_game_over());
        assert!(events.contains(&GameEvent::Collect { id }));

        // Consumed heart lingers one tick, then is swept without scoring again
        assert!(state.objects().iter().any(|o| o.id == id && o.consumed));
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.hearts(), 1);
        assert!(state.objects().iter().all(|o| o.id != id));
    }

    #[test]
    fn test_collision_wins_over_collection() {
        let mut state = started(8);
        state.insert_object(0.0, ObjectKind::Collectible { lane: Lane::CENTER });
        state.insert_object(
            0.0,
            ObjectKind::Obstacle {
                lane: Lane::CENTER,
                label: Hazard::Gaslighting,
            },
        );

        let events = tick(&mut state, &TickInput::default(), 0.0);

        assert!(state.is_game_over());
        assert_eq!(state.hearts(), 0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Collect { .. })));
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let mut state = started(9);
        state.insert_object(
            0.0,
            ObjectKind::Obstacle {
                lane: Lane::CENTER,
                label: Hazard::Drama,
            },
        );
        tick(&mut state, &TickInput::default(), 0.0);
        let score = state.score();
        let speed = state.speed();
        let ticks = state.time_ticks();

        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), FRAME_DT);
            assert!(events.is_empty());
        }
        assert_eq!(state.score(), score);
        assert_eq!(state.speed(), speed);
        assert_eq!(state.time_ticks(), ticks);
    }

    #[test]
    fn test_fifty_unit_ticks_score_and_bounded_world() {
        let mut state = started(11);
        let score_before = state.score();
        let mut max_objects = 0;

        for _ in 0..50 {
            let dt = dt_for(&state, 1.0);
            tick(&mut state, &TickInput::default(), dt);
            max_objects = max_objects.max(state.objects().len());
        }

        assert!(state.is_running());
        let gained = state.score() - score_before;
        assert!((gained - 50.0).abs() < 1e-2, "gained {gained}");
        assert!(!state.objects().is_empty());
        assert!(max_objects <= 12, "world grew to {max_objects}");
    }

    #[test]
    fn test_objects_pruned_past_near_boundary() {
        let mut state = started(12);
        let id = state.insert_object(9.5, ObjectKind::Collectible { lane: Lane::LEFT });
        let dt = dt_for(&state, 1.0);
        tick(&mut state, &TickInput::default(), dt);
        assert!(state.objects().iter().all(|o| o.id != id));
    }

    #[test]
    fn test_step_signal_cadence() {
        let mut state = started(13);
        let mut steps = 0;
        for _ in 0..40 {
            let dt = dt_for(&state, 0.5);
            let events = tick(&mut state, &TickInput::default(), dt);
            steps += events.iter().filter(|e| **e == GameEvent::Step).count();
        }
        // 20 units at 2.5 per step
        assert!((7..=8).contains(&steps), "steps {steps}");
    }

    #[test]
    fn test_long_frame_keeps_step_cadence() {
        let mut state = started(16);
        let dt = dt_for(&state, 10.0);
        let events = tick(&mut state, &TickInput::default(), dt);
        let steps = events.iter().filter(|e| **e == GameEvent::Step).count();
        // 10 units at 2.5 per step
        assert!((3..=4).contains(&steps), "steps {steps}");
    }

    #[test]
    fn test_zero_speed_increment_still_ramps() {
        for increment in [0.0, -0.3] {
            let tuning = Tuning {
                speed_increment: increment,
                ..Default::default()
            };
            let mut state = GameState::with_tuning(1, tuning);
            state.start();
            let before = state.speed();
            tick(&mut state, &TickInput::default(), 0.01);
            assert!(state.speed() > before, "speed stuck at {before}");
        }
    }

    #[test]
    fn test_narrative_failure_uses_fallback() {
        let mut state = started(14);
        state.insert_object(
            0.0,
            ObjectKind::Obstacle {
                lane: Lane::CENTER,
                label: Hazard::Ghosting,
            },
        );
        tick(&mut state, &TickInput::default(), 0.0);

        let request = state.take_summary_request().unwrap();
        assert_eq!(request.hearts, 0);
        assert_eq!(request.hit_labels, vec!["Ghosting".to_string()]);

        assert!(state.deliver_summary(request.generation, Err(NarrativeError::Timeout)));
        assert_eq!(state.summary_text(), Some(FALLBACK_SUMMARY));
        assert!(state.is_game_over());
        assert_eq!(state.hit_history(), &[Hazard::Ghosting]);
    }

    #[test]
    fn test_restart_after_game_over_resets_everything() {
        let mut state = started(15);
        state.insert_object(0.0, ObjectKind::Collectible { lane: Lane::CENTER });
        let dt = dt_for(&state, 0.1);
        tick(&mut state, &TickInput::default(), dt);
        for _ in 0..30 {
            let dt = dt_for(&state, 1.0);
            tick(&mut state, &TickInput::default(), dt);
        }
        let lane = state.lane();
        state.insert_object(
            0.0,
            ObjectKind::Obstacle {
                lane,
                label: Hazard::Ego,
            },
        );
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.is_game_over());
        let old_generation = state.generation();
        let old = state.take_summary_request().unwrap();

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.0,
        );

        assert!(state.is_running());
        assert_eq!(state.generation(), old_generation + 1);
        assert_eq!(state.hearts(), 0);
        assert!(state.hit_history().is_empty());
        assert_eq!(state.lane(), Lane::CENTER);
        assert_eq!(state.summary(), &SummarySlot::Empty);
        // Only the fresh batch from this tick is in the world
        assert!(state.objects().iter().all(|o| o.depth == state.tuning().spawn_boundary));
        assert_eq!(state.score(), 0.0);
        assert_eq!(
            state.speed(),
            state.tuning().initial_speed + state.tuning().speed_increment
        );

        // Late answer for the old run must not land on the new one
        assert!(!state.deliver_summary(old.generation, Ok("old news".into())));
        assert_eq!(state.summary_text(), None);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = started(77);
        let mut b = started(77);
        let inputs = [
            TickInput::default(),
            TickInput {
                steer: Some(Direction::Right),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                steer: Some(Direction::Left),
                ..Default::default()
            },
        ];
        for _ in 0..100 {
            for input in &inputs {
                tick(&mut a, input, FRAME_DT);
                tick(&mut b, input, FRAME_DT);
            }
        }
        assert_eq!(a.objects(), b.objects());
        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.score(), b.score());
    }

    proptest! {
        #[test]
        fn prop_score_and_speed_monotonic(
            seed in any::<u64>(),
            deltas in prop::collection::vec(0.0f32..0.05, 1..200),
            steers in prop::collection::vec(0u8..3, 1..200),
        ) {
            let mut state = started(seed);
            for (i, dt) in deltas.iter().enumerate() {
                let steer = match steers[i % steers.len()] {
                    0 => None,
                    1 => Some(Direction::Left),
                    _ => Some(Direction::Right),
                };
                let was_running = state.is_running();
                let (score, speed) = (state.score(), state.speed());
                tick(&mut state, &TickInput { steer, start: false }, *dt);
                prop_assert!(state.score() >= score);
                if was_running {
                    prop_assert!(state.speed() > speed);
                } else {
                    prop_assert_eq!(state.score(), score);
                    prop_assert_eq!(state.speed(), speed);
                }
            }
        }
    }
}
