//! Per-frame simulation tick
//!
//! Order within one tick:
//! 1. advance the session clock and fire due deferred actions (stale epochs dropped)
//! 2. apply queued input actions
//! 3. (Running only) ramp speed, accrue passive score
//! 4. fire the spawn timer, placing new entities at the spawn line
//! 5. move every entity, including ones placed this tick, and prune the far edge
//! 6. move the avatar (lane tween, jump arc), footsteps
//! 7. resolve contacts in id order

use glam::Vec2;

use super::entity::EntityKind;
use super::lane::Lane;
use super::ramp;
use super::spawn::{SpawnPlan, plan_spawn};
use super::state::{DeferredAction, DespawnReason, GameEvent, GameState, RunPhase};
use crate::consts::{DESPAWN_MARGIN, FIELD_HEIGHT, SPAWN_Y};
use crate::input::Action;

/// Input actions collected since the previous tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub actions: Vec<Action>,
}

impl TickInput {
    pub fn with(action: Action) -> Self {
        Self {
            actions: vec![action],
        }
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Advance the game by one step of `dt` seconds.
///
/// Contacts are sampled once per step, so callers keep `dt` at or below
/// `SIM_DT`; `Session::tick` splits host frames accordingly.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    state.clock += dt;
    run_deferred(state);

    for &action in &input.actions {
        apply_action(state, action);
    }

    if state.phase != RunPhase::Running {
        return;
    }

    let tuning = state.tuning.clone();

    state.ramp.advance(dt, &tuning);
    let speed = state.ramp.speed;
    state.score += speed as f64 * dt as f64 * tuning.distance_score_rate;

    state.scheduler.advance(dt * 1000.0);
    while state.scheduler.take_due() {
        let t = state.progress();
        let plan = plan_spawn(&mut state.rng, t, &tuning);
        place(state, plan);
        state.scheduler.rearm(ramp::spawn_interval_ms(t, &tuning));
    }

    let pruned = state
        .tracker
        .advance(speed * dt, FIELD_HEIGHT + DESPAWN_MARGIN);
    for entity in pruned {
        state.emit(GameEvent::EntityDespawned {
            id: entity.id,
            kind: entity.kind,
            lane: entity.lane,
            pos: entity.pos,
            reason: DespawnReason::OffField,
        });
    }

    if state.avatar.update(dt, tuning.gravity) {
        state.emit(GameEvent::Landed);
    }

    state.step_accumulator += dt;
    if state.step_accumulator >= ramp::footstep_interval(state.progress(), &tuning) {
        state.step_accumulator = 0.0;
        if state.avatar.is_grounded() {
            state.emit(GameEvent::Footstep);
        }
    }

    resolve_contacts(state);
    state.sync_displayed_score();
}

/// Place every entity of a plan at the spawn line. Returns the new ids.
pub fn place(state: &mut GameState, plan: SpawnPlan) -> Vec<u32> {
    place_at(state, plan, SPAWN_Y)
}

/// Place a plan with its lead entity at forward position `y`
pub fn place_at(state: &mut GameState, plan: SpawnPlan, y: f32) -> Vec<u32> {
    log::debug!("Spawning {:?} at progress {:.2}", plan, state.progress());
    plan.placements()
        .into_iter()
        .map(|p| {
            let pos = Vec2::new(state.road.lane_x(p.lane), y - p.trail);
            let id = state.tracker.spawn(p.kind, p.lane, pos);
            state.emit(GameEvent::EntitySpawned {
                id,
                kind: p.kind,
                lane: p.lane,
                pos,
            });
            id
        })
        .collect()
}

/// Place a single entity directly (for scripted setups and tests)
pub fn place_entity(state: &mut GameState, kind: EntityKind, lane: Lane, y: f32) -> u32 {
    let plan = match kind {
        EntityKind::Token => SpawnPlan::TokenRun { lane, count: 1 },
        kind => SpawnPlan::Single { lane, kind },
    };
    place_at(state, plan, y).first().copied().unwrap_or_default()
}

fn apply_action(state: &mut GameState, action: Action) {
    match (state.phase, action) {
        (RunPhase::Idle, Action::Confirm) => state.start_run(),
        (RunPhase::Ended, Action::Confirm) => state.reset_run(),
        (RunPhase::Running, Action::Confirm | Action::Up) => {
            let velocity = state.tuning.jump_velocity;
            if state.avatar.try_jump(velocity) {
                state.emit(GameEvent::Jumped);
            }
        }
        (RunPhase::Running, Action::Down) => {
            if state.avatar.try_slide() {
                let window = state.tuning.slide_duration_ms / 1000.0;
                state.defer(window, DeferredAction::EndSlide);
                state.emit(GameEvent::SlideStarted);
            }
        }
        (RunPhase::Running, Action::Left | Action::Right) => {
            let direction = if action == Action::Left { -1 } else { 1 };
            let road = state.road;
            if let Some(from) = state.avatar.shift_lane(direction, &road) {
                let to = state.avatar.lane;
                state.emit(GameEvent::LaneChanged { from, to });
            }
        }
        (RunPhase::Ended, Action::Share) => {
            let score = state.score_floor();
            state.emit(GameEvent::ShareRequested { score });
        }
        // Everything else is a defined no-op
        _ => {}
    }
}

fn run_deferred(state: &mut GameState) {
    if state.deferred.is_empty() {
        return;
    }
    let clock = state.clock;
    let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut state.deferred)
        .into_iter()
        .partition(|d| d.due <= clock);
    state.deferred = pending;

    for deferred in due {
        if deferred.epoch != state.epoch {
            log::debug!(
                "Dropping stale {:?} from epoch {} (now {})",
                deferred.action,
                deferred.epoch,
                state.epoch
            );
            continue;
        }
        match deferred.action {
            DeferredAction::EndSlide => {
                if state.avatar.end_slide() {
                    state.emit(GameEvent::SlideEnded);
                }
            }
            DeferredAction::RevealResults => {
                if state.phase == RunPhase::Ended {
                    if let Some(summary) = state.summary {
                        state.emit(GameEvent::ResultsReady {
                            score: summary.score,
                            best: summary.best,
                            new_best: summary.new_best,
                        });
                    }
                }
            }
        }
    }
}

fn resolve_contacts(state: &mut GameState) {
    let rect = state.avatar.hitbox();
    let band = state.avatar.band();
    for id in state.tracker.contacts(&rect, &band) {
        if state.phase != RunPhase::Running {
            break;
        }
        let Some(kind) = state.tracker.get(id).map(|e| e.kind) else {
            continue;
        };
        if kind.is_obstacle() {
            if let Some(hit) = state.tracker.get(id).cloned() {
                state.end_run(&hit);
            }
        } else if let Some(token) = state.tracker.remove(id) {
            state.score += state.tuning.token_value;
            state.emit(GameEvent::TokenCollected {
                id: token.id,
                lane: token.lane,
                value: state.tuning.token_value as u32,
            });
            state.emit(GameEvent::EntityDespawned {
                id: token.id,
                kind: token.kind,
                lane: token.lane,
                pos: token.pos,
                reason: DespawnReason::Collected,
            });
        }
    }
}
