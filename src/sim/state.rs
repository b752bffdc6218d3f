//! Game state and core simulation types
//!
//! Everything the run state machine owns lives here: the phase, score, ramp,
//! avatar, tracked entities, spawn timer and the queue of deferred actions.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Band, Footprint, Rect};
use super::entity::{Entity, EntityKind, EntityTracker};
use super::lane::{Lane, RoadGeometry};
use super::ramp::DifficultyRamp;
use super::spawn::SpawnScheduler;
use crate::consts::{LANE_TWEEN_SECS, PLAYER_Y};
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the start input
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by an obstacle; waiting for restart
    Ended,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Running => "running",
            RunPhase::Ended => "ended",
        }
    }
}

/// Vertical motion of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Grounded,
    Airborne,
    Sliding,
}

/// Standing hit rectangle (also used in the air)
pub const STANDING_FOOTPRINT: Footprint = Footprint::new(44.0, 92.0, 0.0, 10.0);
/// Short, wide hit rectangle while sliding
pub const SLIDING_FOOTPRINT: Footprint = Footprint::new(60.0, 60.0, 0.0, 24.0);
/// Height of the runner standing (and in the air, above its altitude)
pub const STANDING_STATURE: f32 = 92.0;
/// Height of the runner while sliding
pub const SLIDING_STATURE: f32 = 48.0;

/// In-flight lane change tween
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct LaneShift {
    from_x: f32,
    to_x: f32,
    elapsed: f32,
}

/// The player-controlled runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub lane: Lane,
    /// Current horizontal position (tweens toward the lane centre)
    pub x: f32,
    /// Height above the road
    pub altitude: f32,
    /// Upward velocity while airborne
    pub vertical_vel: f32,
    pub motion: MotionState,
    shift: Option<LaneShift>,
}

impl Avatar {
    /// Grounded in the centre lane
    pub fn centered(road: &RoadGeometry) -> Self {
        Self {
            lane: Lane::CENTER,
            x: road.lane_x(Lane::CENTER),
            altitude: 0.0,
            vertical_vel: 0.0,
            motion: MotionState::Grounded,
            shift: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, PLAYER_Y)
    }

    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    pub fn is_shifting(&self) -> bool {
        self.shift.is_some()
    }

    /// Footprint preset for the current motion state
    pub fn footprint(&self) -> Footprint {
        match self.motion {
            MotionState::Sliding => SLIDING_FOOTPRINT,
            MotionState::Grounded | MotionState::Airborne => STANDING_FOOTPRINT,
        }
    }

    pub fn hitbox(&self) -> Rect {
        self.footprint().at(self.position())
    }

    /// Height range currently occupied
    pub fn band(&self) -> Band {
        match self.motion {
            MotionState::Sliding => Band::new(0.0, SLIDING_STATURE),
            MotionState::Grounded | MotionState::Airborne => {
                Band::new(0.0, STANDING_STATURE).raised(self.altitude)
            }
        }
    }

    /// Start moving one lane over. Returns the lane left, or `None` at an edge.
    pub fn shift_lane(&mut self, direction: i8, road: &RoadGeometry) -> Option<Lane> {
        let from = self.lane;
        let to = from.shifted(direction);
        if to == from {
            return None;
        }
        self.lane = to;
        self.shift = Some(LaneShift {
            from_x: self.x,
            to_x: road.lane_x(to),
            elapsed: 0.0,
        });
        Some(from)
    }

    /// Launch a jump; only from the ground
    pub fn try_jump(&mut self, velocity: f32) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.motion = MotionState::Airborne;
        self.vertical_vel = velocity;
        true
    }

    /// Drop into a slide; only from the ground
    pub fn try_slide(&mut self) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.motion = MotionState::Sliding;
        true
    }

    /// Stand back up. Returns false if the runner was not sliding.
    pub fn end_slide(&mut self) -> bool {
        if self.motion != MotionState::Sliding {
            return false;
        }
        self.motion = MotionState::Grounded;
        true
    }

    /// Advance the lane tween and jump arc. Returns true on landing.
    pub fn update(&mut self, dt: f32, gravity: f32) -> bool {
        if let Some(mut shift) = self.shift {
            shift.elapsed += dt;
            let p = (shift.elapsed / LANE_TWEEN_SECS).min(1.0);
            // Sine ease-out
            let eased = (p * std::f32::consts::FRAC_PI_2).sin();
            self.x = shift.from_x + (shift.to_x - shift.from_x) * eased;
            self.shift = if p >= 1.0 {
                self.x = shift.to_x;
                None
            } else {
                Some(shift)
            };
        }

        if self.motion == MotionState::Airborne {
            self.vertical_vel -= gravity * dt;
            self.altitude += self.vertical_vel * dt;
            if self.altitude <= 0.0 {
                self.altitude = 0.0;
                self.vertical_vel = 0.0;
                self.motion = MotionState::Grounded;
                return true;
            }
        }
        false
    }
}

/// One-shot actions that fire after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Slide window elapsed
    EndSlide,
    /// Post-collision pause elapsed; results can be shown
    RevealResults,
}

/// A deferred action tagged with the run epoch that scheduled it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deferred {
    /// Session clock time (seconds) at which to fire
    pub due: f32,
    pub epoch: u32,
    pub action: DeferredAction,
}

/// Why an entity left the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Scrolled past the trailing edge
    OffField,
    /// Picked up by the runner
    Collected,
    /// Cleared by a restart
    Reset,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged {
        from: RunPhase,
        to: RunPhase,
    },
    /// Displayed (floored) score changed
    ScoreChanged {
        score: u64,
    },
    EntitySpawned {
        id: u32,
        kind: EntityKind,
        lane: Lane,
        pos: Vec2,
    },
    EntityDespawned {
        id: u32,
        kind: EntityKind,
        lane: Lane,
        pos: Vec2,
        reason: DespawnReason,
    },
    TokenCollected {
        id: u32,
        lane: Lane,
        value: u32,
    },
    ObstacleHit {
        id: u32,
        kind: EntityKind,
        lane: Lane,
    },
    LaneChanged {
        from: Lane,
        to: Lane,
    },
    Jumped,
    Landed,
    SlideStarted,
    SlideEnded,
    Footstep,
    /// Final score beat the stored best
    NewBest {
        best: u64,
    },
    /// Post-collision pause is over; show the end screen
    ResultsReady {
        score: u64,
        best: u64,
        new_best: bool,
    },
    ShareRequested {
        score: u64,
    },
}

/// Final numbers of an ended run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub best: u64,
    pub new_best: bool,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub road: RoadGeometry,
    pub phase: RunPhase,
    /// Incremented on every restart; deferred actions from older epochs are dropped
    pub epoch: u32,
    /// Score for the current run (passive accrual plus token bonuses)
    pub score: f64,
    /// Best score known this session
    pub best: u64,
    pub ramp: DifficultyRamp,
    pub avatar: Avatar,
    pub tracker: EntityTracker,
    pub scheduler: SpawnScheduler,
    /// Seconds since the session started, across all phases
    pub clock: f32,
    /// Summary of the last ended run
    pub summary: Option<RunSummary>,
    pub(crate) step_accumulator: f32,
    pub(crate) deferred: Vec<Deferred>,
    pub(crate) displayed_score: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// New idle session with a known best score
    pub fn new(seed: u64, tuning: Tuning, best: u64) -> Self {
        let road = RoadGeometry::default();
        Self {
            seed,
            road,
            phase: RunPhase::Idle,
            epoch: 0,
            score: 0.0,
            best,
            ramp: DifficultyRamp::new(&tuning),
            avatar: Avatar::centered(&road),
            tracker: EntityTracker::new(),
            scheduler: SpawnScheduler::primed(&tuning),
            clock: 0.0,
            summary: None,
            step_accumulator: 0.0,
            deferred: Vec::new(),
            displayed_score: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            tuning,
        }
    }

    pub fn speed(&self) -> f32 {
        self.ramp.speed
    }

    /// Normalized difficulty progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.ramp.progress(&self.tuning)
    }

    /// Score as shown to the player
    pub fn score_floor(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn entities(&self) -> &[Entity] {
        self.tracker.entities()
    }

    /// Actions scheduled but not yet fired
    pub fn pending_deferred(&self) -> &[Deferred] {
        &self.deferred
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn defer(&mut self, after_secs: f32, action: DeferredAction) {
        self.deferred.push(Deferred {
            due: self.clock + after_secs.max(0.0),
            epoch: self.epoch,
            action,
        });
    }

    pub(crate) fn set_phase(&mut self, to: RunPhase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.emit(GameEvent::PhaseChanged { from, to });
        }
    }

    pub(crate) fn sync_displayed_score(&mut self) {
        let shown = self.score_floor();
        if shown != self.displayed_score {
            self.displayed_score = shown;
            self.emit(GameEvent::ScoreChanged { score: shown });
        }
    }

    /// Idle -> Running
    pub(crate) fn start_run(&mut self) {
        if self.phase != RunPhase::Idle {
            return;
        }
        self.score = 0.0;
        self.ramp = DifficultyRamp::new(&self.tuning);
        self.step_accumulator = 0.0;
        self.summary = None;
        self.scheduler = SpawnScheduler::primed(&self.tuning);
        self.scheduler.start();
        self.set_phase(RunPhase::Running);
        self.sync_displayed_score();
        log::info!("Run started (epoch {}, seed {})", self.epoch, self.seed);
    }

    /// Running -> Ended. Only the first call per run has any effect.
    pub(crate) fn end_run(&mut self, hit: &Entity) {
        if self.phase != RunPhase::Running {
            return;
        }
        self.scheduler.stop();
        self.emit(GameEvent::ObstacleHit {
            id: hit.id,
            kind: hit.kind,
            lane: hit.lane,
        });
        self.set_phase(RunPhase::Ended);

        let score = self.score_floor();
        let new_best = score > self.best;
        if new_best {
            self.best = score;
            self.emit(GameEvent::NewBest { best: score });
        }
        self.summary = Some(RunSummary {
            score,
            best: self.best,
            new_best,
        });

        let delay = self.tuning.results_delay_ms / 1000.0;
        self.defer(delay, DeferredAction::RevealResults);
        log::info!(
            "Run ended by {} in lane {}: score {}, best {}{}",
            hit.kind.as_str(),
            hit.lane.index(),
            score,
            self.best,
            if new_best { " (new best)" } else { "" }
        );
    }

    /// Ended (or Idle) -> Idle with a fresh run
    pub(crate) fn reset_run(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        for entity in self.tracker.entities().to_vec() {
            self.emit(GameEvent::EntityDespawned {
                id: entity.id,
                kind: entity.kind,
                lane: entity.lane,
                pos: entity.pos,
                reason: DespawnReason::Reset,
            });
        }
        self.tracker.clear();
        self.score = 0.0;
        self.ramp = DifficultyRamp::new(&self.tuning);
        self.avatar = Avatar::centered(&self.road);
        self.scheduler = SpawnScheduler::primed(&self.tuning);
        self.step_accumulator = 0.0;
        self.set_phase(RunPhase::Idle);
        self.sync_displayed_score();
        log::debug!("Run reset (epoch {})", self.epoch);
    }
}
