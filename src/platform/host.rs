//! Shared frame loop for interactive hosts
//!
//! Audio backends and narrators call out into host-language code, which may
//! call straight back in (a sound callback that queues a lane change, say).
//! So the session borrow is always released before any of them run.

use std::cell::RefCell;

use crate::audio::{AudioBackend, AudioManager};
use crate::narrative::SummaryRequest;
use crate::settings::Settings;
use crate::sim::{Direction, GameState, Snapshot, TickInput, tick};

/// Session plus the input gathered since the last frame
pub struct Host {
    pub state: GameState,
    pub settings: Settings,
    input: TickInput,
}

impl Host {
    pub fn new(state: GameState, settings: Settings) -> Self {
        Self {
            state,
            settings,
            input: TickInput::default(),
        }
    }

    /// Latest steer request wins until the next frame consumes it
    pub fn queue_steer(&mut self, direction: Direction) {
        self.input.steer = Some(direction);
    }

    pub fn queue_start(&mut self) {
        self.input.start = true;
    }

    pub fn pending_input(&self) -> &TickInput {
        &self.input
    }
}

/// What a frame hands back to the host
pub struct FrameOutput {
    pub snapshot: Snapshot,
    /// Narrative request to fire, at most once per run
    pub summary_request: Option<SummaryRequest>,
}

/// Tick the session, then play the frame's sounds with the session unborrowed
pub fn run_frame<B: AudioBackend>(
    host: &RefCell<Host>,
    audio: &RefCell<AudioManager<B>>,
    dt: f32,
) -> FrameOutput {
    let (events, output) = {
        let mut host = host.borrow_mut();
        let host = &mut *host;
        let input = std::mem::take(&mut host.input);
        let events = tick(&mut host.state, &input, dt.max(0.0));
        let output = FrameOutput {
            snapshot: host.state.snapshot(),
            summary_request: host.state.take_summary_request(),
        };
        (events, output)
    };
    audio.borrow_mut().handle_events(&events);
    output
}
