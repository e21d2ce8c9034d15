//! Game state and core simulation types
//!
//! The session owns everything a run needs: counters, the world objects, the
//! random source and the summary slot. Other code reads it freely but changes
//! it only through the transition methods here and in `tick`.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionOutcome;
use super::lane::Lane;
use super::spawn::{self, RandomSource};
use super::world;
use crate::consts::{LANE_WIDTH, ROADSIDE_OFFSET};
use crate::narrative::{self, NarrativeError, SummaryRequest};
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    Idle,
    /// Active run
    Running,
    /// Run ended on a hazard
    GameOver,
}

/// Hazard categories an obstacle can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    Ego,
    Jealousy,
    Ghosting,
    Gaslighting,
    Drama,
}

impl Hazard {
    pub const ALL: [Hazard; 5] = [
        Hazard::Ego,
        Hazard::Jealousy,
        Hazard::Ghosting,
        Hazard::Gaslighting,
        Hazard::Drama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Ego => "Ego",
            Hazard::Jealousy => "Jealousy",
            Hazard::Ghosting => "Ghosting",
            Hazard::Gaslighting => "Gaslighting",
            Hazard::Drama => "Drama",
        }
    }
}

/// Which side of the track a decoration stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Roadside {
    Left,
    Right,
}

impl Roadside {
    /// Horizontal world offset, always outside the lane band
    pub fn x_offset(&self) -> f32 {
        match self {
            Roadside::Left => -ROADSIDE_OFFSET,
            Roadside::Right => ROADSIDE_OFFSET,
        }
    }
}

/// Cosmetic decoration variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationVariant {
    Tree,
    Lamp,
}

/// What a world object is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Ends the run on contact
    Obstacle { lane: Lane, label: Hazard },
    /// A heart
    Collectible { lane: Lane },
    /// Scenery beside the track, never collides
    Decoration {
        side: Roadside,
        variant: DecorationVariant,
    },
}

/// An entity scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: u32,
    /// Distance along the travel axis; grows as the object approaches
    pub depth: f32,
    pub kind: ObjectKind,
    /// Resolved by a collision; hidden and swept on the next tick
    pub consumed: bool,
}

impl WorldObject {
    pub fn new(id: u32, depth: f32, kind: ObjectKind) -> Self {
        Self {
            id,
            depth,
            kind,
            consumed: false,
        }
    }

    /// Lane for gameplay objects, `None` for decorations
    pub fn lane(&self) -> Option<Lane> {
        match self.kind {
            ObjectKind::Obstacle { lane, .. } | ObjectKind::Collectible { lane } => Some(lane),
            ObjectKind::Decoration { .. } => None,
        }
    }

    pub fn label(&self) -> Option<Hazard> {
        match self.kind {
            ObjectKind::Obstacle { label, .. } => Some(label),
            _ => None,
        }
    }

    /// True for live obstacles and collectibles
    pub fn is_collidable(&self) -> bool {
        !self.consumed && !matches!(self.kind, ObjectKind::Decoration { .. })
    }

    /// Presentation position: x across lanes, z along the track
    pub fn position(&self, lane_width: f32) -> Vec3 {
        let x = match self.kind {
            ObjectKind::Decoration { side, .. } => side.x_offset(),
            ObjectKind::Obstacle { lane, .. } | ObjectKind::Collectible { lane } => {
                lane.x_offset(lane_width)
            }
        };
        Vec3::new(x, 0.0, self.depth)
    }
}

/// Feedback signals for the audio and presentation collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Footstep cadence
    Step,
    /// Player changed lane
    Move { lane: Lane },
    /// Heart picked up
    Collect { id: u32 },
    /// Ran into a hazard
    Hit { id: u32, label: Hazard },
    /// Run ended; the summary request for this generation is queued
    GameOver { generation: u64 },
}

/// Post-game summary text slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum SummarySlot {
    #[default]
    Empty,
    /// Request issued, waiting on the service
    Pending,
    Ready(String),
}

/// Monotonic entity ID source
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub(crate) tuning: Tuning,
    pub(crate) phase: GamePhase,
    pub(crate) score: f64,
    pub(crate) hearts: u32,
    pub(crate) speed: f32,
    pub(crate) hit_history: Vec<Hazard>,
    pub(crate) lane: Lane,
    /// Live objects, in spawn order
    pub(crate) objects: Vec<WorldObject>,
    /// Distance covered this run
    pub(crate) distance: f32,
    /// Distance since the last footstep signal
    pub(crate) step_progress: f32,
    pub(crate) time_ticks: u64,
    /// Bumped on every start/reset; tags summary requests
    pub(crate) generation: u64,
    pub(crate) summary: SummarySlot,
    pending_request: Option<SummaryRequest>,
    pub(crate) rng: R,
    pub(crate) ids: EntityIds,
}

impl GameState<Pcg32> {
    /// New idle session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), tuning)
    }
}

impl<R: RandomSource> GameState<R> {
    /// New idle session drawing spawns from `rng`
    pub fn with_rng(rng: R, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            phase: GamePhase::Idle,
            score: 0.0,
            hearts: 0,
            speed: tuning.initial_speed,
            hit_history: Vec::new(),
            lane: Lane::CENTER,
            objects: Vec::with_capacity(32),
            distance: 0.0,
            step_progress: 0.0,
            time_ticks: 0,
            generation: 0,
            summary: SummarySlot::Empty,
            pending_request: None,
            rng,
            ids: EntityIds::default(),
            tuning,
        }
    }

    // === Read access ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn hit_history(&self) -> &[Hazard] {
        &self.hit_history
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    /// Objects the presentation layer should draw
    pub fn visible_objects(&self) -> impl Iterator<Item = &WorldObject> {
        world::visible(&self.objects)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn summary(&self) -> &SummarySlot {
        &self.summary
    }

    /// Summary text once the narrative has resolved
    pub fn summary_text(&self) -> Option<&str> {
        match &self.summary {
            SummarySlot::Ready(text) => Some(text),
            _ => None,
        }
    }

    // === Transitions ===

    /// Idle/GameOver -> Running with a fresh run. No-op while running.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            return;
        }
        self.clear_run();
        self.generation += 1;
        self.phase = GamePhase::Running;
        log::info!("Run {} started (speed {:.2})", self.generation, self.speed);
    }

    /// Back to Idle with everything cleared; in-flight summaries go stale
    pub fn reset(&mut self) {
        self.clear_run();
        self.generation += 1;
        self.phase = GamePhase::Idle;
        log::info!("Session reset");
    }

    fn clear_run(&mut self) {
        self.score = 0.0;
        self.hearts = 0;
        self.speed = self.tuning.initial_speed;
        self.hit_history.clear();
        self.lane = Lane::CENTER;
        self.objects.clear();
        self.distance = 0.0;
        self.step_progress = 0.0;
        self.time_ticks = 0;
        self.summary = SummarySlot::Empty;
        self.pending_request = None;
        self.ids = EntityIds::default();
    }

    /// Place an object directly into the world (scripted scenarios, tutorials)
    pub fn insert_object(&mut self, depth: f32, kind: ObjectKind) -> u32 {
        let id = self.ids.next();
        self.objects.push(WorldObject::new(id, depth, kind));
        id
    }

    /// Append a freshly generated batch at the spawn boundary
    pub(crate) fn spawn_batch(&mut self) {
        let batch = spawn::generate_batch(&mut self.rng, &mut self.ids, &self.tuning);
        log::debug!(
            "Spawned {} object(s) at depth {} (world size {})",
            batch.len(),
            self.tuning.spawn_boundary,
            self.objects.len() + batch.len()
        );
        self.objects.extend(batch);
    }

    /// Apply a collision verdict, pushing feedback into `events`
    pub(crate) fn apply_collision(
        &mut self,
        outcome: CollisionOutcome,
        events: &mut Vec<GameEvent>,
    ) {
        match outcome {
            CollisionOutcome::Clear => {}
            CollisionOutcome::Collect { ids } => {
                for id in ids {
                    if self.consume(id) {
                        self.hearts += 1;
                        events.push(GameEvent::Collect { id });
                    }
                }
            }
            CollisionOutcome::Crash { id, label } => {
                self.consume(id);
                self.hit_history.push(label);
                events.push(GameEvent::Hit { id, label });
                self.end_run();
                events.push(GameEvent::GameOver {
                    generation: self.generation,
                });
            }
        }
    }

    fn consume(&mut self, id: u32) -> bool {
        match self.objects.iter_mut().find(|o| o.id == id && !o.consumed) {
            Some(object) => {
                object.consumed = true;
                true
            }
            None => false,
        }
    }

    /// Running -> GameOver; queues the narrative request
    fn end_run(&mut self) {
        self.phase = GamePhase::GameOver;
        self.pending_request = Some(SummaryRequest {
            generation: self.generation,
            hearts: self.hearts,
            hit_labels: self.hit_history.iter().map(|h| h.as_str().to_string()).collect(),
        });
        self.summary = SummarySlot::Pending;
        log::info!(
            "Run {} over: score {:.0}, hearts {}, hits {:?}",
            self.generation,
            self.score,
            self.hearts,
            self.hit_history
        );
    }

    /// Hand the queued narrative request to the host (at most once per run)
    pub fn take_summary_request(&mut self) -> Option<SummaryRequest> {
        self.pending_request.take()
    }

    /// Attach a narrative result to the run that requested it
    ///
    /// Returns false when the response belongs to an older session or the
    /// slot is no longer waiting.
    pub fn deliver_summary(
        &mut self,
        generation: u64,
        result: Result<String, NarrativeError>,
    ) -> bool {
        if generation != self.generation || self.summary != SummarySlot::Pending {
            log::warn!(
                "Discarding stale summary for run {} (current run {})",
                generation,
                self.generation
            );
            return false;
        }
        self.summary = SummarySlot::Ready(narrative::resolve(result));
        true
    }

    /// Serializable view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score.floor() as u64,
            hearts: self.hearts,
            speed: self.speed,
            lane: self.lane,
            hits: self.hit_history.iter().map(|h| h.as_str()).collect(),
            summary: self.summary_text().map(str::to_string),
            objects: self
                .visible_objects()
                .map(|o| ObjectView {
                    id: o.id,
                    kind: o.kind,
                    depth: o.depth,
                    position: o.position(LANE_WIDTH),
                })
                .collect(),
        }
    }
}

/// One drawable object
#[derive(Debug, Clone, Serialize)]
pub struct ObjectView {
    pub id: u32,
    pub kind: ObjectKind,
    pub depth: f32,
    pub position: Vec3,
}

/// Per-frame view of the session for rendering and HUD
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub hearts: u32,
    pub speed: f32,
    pub lane: Lane,
    pub hits: Vec<&'static str>,
    pub summary: Option<String>,
    pub objects: Vec<ObjectView>,
}
