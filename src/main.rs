//! Heart Dash native entry point
//!
//! Headless driver: runs one session on an autopilot that dodges hazards and
//! chases hearts, then narrates the result and prints the final snapshot.
//!
//! Usage: `heart-dash [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use heart_dash::audio::{AudioManager, SilentAudio};
    use heart_dash::consts::FRAME_DT;
    use heart_dash::narrative::{NarrativeService, TemplateNarrative};
    use heart_dash::sim::{GameState, TickInput, tick};
    use heart_dash::tuning::Tuning;

    env_logger::init();
    log::info!("Heart Dash (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = args
        .next()
        .map(|path| Tuning::load(std::path::Path::new(&path)))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    let mut state = GameState::with_tuning(seed, tuning);
    let mut audio = AudioManager::new(SilentAudio);
    let narrator = TemplateNarrative;

    // Cap the run at ten simulated minutes
    let max_frames = 60 * 60 * 10;
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };
    for _ in 0..max_frames {
        let events = tick(&mut state, &input, FRAME_DT);
        audio.handle_events(&events);

        if let Some(request) = state.take_summary_request() {
            let result = narrator.summarize(&request);
            state.deliver_summary(request.generation, result);
        }
        if state.is_game_over() {
            break;
        }
        input = TickInput {
            steer: autopilot::steer(&state),
            start: false,
        };
    }

    log::info!(
        "Finished after {} ticks ({:.1} units)",
        state.time_ticks(),
        state.distance()
    );
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use heart_dash::sim::{Direction, GameState, Lane, ObjectKind};

    /// How far ahead the autopilot looks
    const LOOKAHEAD: f32 = 8.0;

    /// Pick a lane change for this frame, if any
    pub fn steer(state: &GameState) -> Option<Direction> {
        let player_depth = state.tuning().player_depth;
        let lane_score = |lane: Lane| -> i32 {
            state
                .visible_objects()
                .filter(|o| o.lane() == Some(lane))
                .filter(|o| o.depth <= player_depth + 1.0 && o.depth >= player_depth - LOOKAHEAD)
                .map(|o| match o.kind {
                    ObjectKind::Obstacle { .. } => -10,
                    ObjectKind::Collectible { .. } => 1,
                    ObjectKind::Decoration { .. } => 0,
                })
                .sum()
        };

        let current = state.lane();
        let best = Lane::ALL
            .into_iter()
            .filter(|l| (l.index() - current.index()).abs() <= 1)
            .max_by_key(|&l| (lane_score(l), l == current))?;

        match best.index().cmp(&current.index()) {
            std::cmp::Ordering::Less => Some(Direction::Left),
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}
