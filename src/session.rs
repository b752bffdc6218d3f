//! Session adapter
//!
//! Owns the pure `GameState` together with the best-score store and feeds
//! queued actions into the simulation. The best score is read once when the
//! session is created and written back only when a run sets a new best.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::input::{Action, Gesture};
use crate::persistence::{BestScoreStore, load_or_default};
use crate::sim::{Entity, GameEvent, GameState, RunPhase, TickInput, tick};
use crate::tuning::Tuning;

/// Receives game events for display, sound and sharing
pub trait Presenter {
    fn present(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> Presenter for F {
    fn present(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _event: &GameEvent) {}
}

/// Logs every event at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, event: &GameEvent) {
        log::debug!("{:?}", event);
    }
}

/// Text offered to the host's share sheet for a finished run
pub fn share_message(score: u64) -> String {
    format!("I ran {} in RUNNER. Can you beat it?", score)
}

pub struct Session<S: BestScoreStore> {
    state: GameState,
    store: S,
    input: TickInput,
}

impl<S: BestScoreStore> Session<S> {
    /// Create an idle session. A store that cannot be read starts the
    /// session with a best of 0.
    pub fn new(mut store: S, seed: u64, tuning: Tuning) -> Self {
        let best = load_or_default(&mut store);
        Self {
            state: GameState::new(seed, tuning, best),
            store,
            input: TickInput::default(),
        }
    }

    /// Create an idle session with a best already read from `store`, so a
    /// host starting run after run does not reload it each time.
    pub fn with_best(store: S, seed: u64, tuning: Tuning, best: u64) -> Self {
        Self {
            state: GameState::new(seed, tuning, best),
            store,
            input: TickInput::default(),
        }
    }

    /// Queue a gesture for the next tick
    pub fn gesture(&mut self, gesture: Gesture) {
        self.input.push(gesture.action());
    }

    /// Queue a raw action for the next tick
    pub fn action(&mut self, action: Action) {
        self.input.push(action);
    }

    /// Ask to share the final score. Ignored unless the run has ended.
    pub fn request_share(&mut self) {
        self.input.push(Action::Share);
    }

    /// Advance by `dt` seconds and hand the resulting events to `presenter`.
    ///
    /// Frame deltas above `MAX_FRAME_DT` are clamped, and the rest is split
    /// into equal substeps no longer than `SIM_DT` so contacts are checked
    /// at every step. Queued actions apply on the first substep only.
    pub fn tick<P: Presenter + ?Sized>(&mut self, dt: f32, presenter: &mut P) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let substeps = ((dt / SIM_DT).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let step = dt / substeps as f32;

        tick(&mut self.state, &self.input, step);
        self.input.clear();
        for _ in 1..substeps {
            tick(&mut self.state, &self.input, step);
        }

        for event in self.state.drain_events() {
            if let GameEvent::NewBest { best } = event {
                if let Err(e) = self.store.save_best(best) {
                    log::warn!("Failed to persist best score {}: {}", best, e);
                }
            }
            presenter.present(&event);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts that stage scenarios (tutorials, tests)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    /// Displayed (floored) score
    pub fn score(&self) -> u64 {
        self.state.score_floor()
    }

    pub fn best(&self) -> u64 {
        self.state.best
    }

    pub fn speed(&self) -> f32 {
        self.state.speed()
    }

    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    pub fn entities(&self) -> &[Entity] {
        self.state.entities()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
