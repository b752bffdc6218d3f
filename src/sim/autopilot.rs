//! Demo autopilot
//!
//! A simple reactive player used by the headless driver and attract mode:
//! dodge into a clear lane when one exists, otherwise jump low barriers and
//! slide under overhead ones, and drift toward tokens when nothing threatens.

use super::entity::EntityKind;
use super::lane::Lane;
use super::state::{GameState, RunPhase};
use crate::consts::PLAYER_Y;
use crate::input::Action;

/// How far ahead (in seconds of travel) the autopilot looks for threats
const LOOKAHEAD_SECS: f32 = 0.45;
/// Distance ahead at which a low barrier starts overlapping the runner
const LOW_BARRIER_REACH: f32 = 78.0;
/// Distance ahead at which an overhead bar starts overlapping the runner
const OVERHEAD_REACH: f32 = 22.0;

/// Distance still to travel before an entity at `y` reaches the runner
fn distance_ahead(y: f32) -> f32 {
    PLAYER_Y - y
}

fn nearest_obstacle(state: &GameState, lane: Lane, horizon: f32) -> Option<(EntityKind, f32)> {
    state
        .entities()
        .iter()
        .filter(|e| e.lane == lane && e.kind.is_obstacle())
        .map(|e| (e.kind, distance_ahead(e.pos.y)))
        .filter(|&(_, d)| d > -110.0 && d < horizon)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

fn lane_is_clear(state: &GameState, lane: Lane, horizon: f32) -> bool {
    nearest_obstacle(state, lane, horizon).is_none()
}

fn tokens_ahead(state: &GameState, lane: Lane, horizon: f32) -> usize {
    state
        .entities()
        .iter()
        .filter(|e| e.lane == lane && e.kind == EntityKind::Token)
        .filter(|e| {
            let d = distance_ahead(e.pos.y);
            d > 0.0 && d < horizon
        })
        .count()
}

/// Pick the action the autopilot would take this tick, if any
pub fn decide(state: &GameState) -> Option<Action> {
    match state.phase {
        RunPhase::Idle => return Some(Action::Confirm),
        RunPhase::Ended => return None,
        RunPhase::Running => {}
    }

    let avatar = &state.avatar;
    if avatar.is_shifting() || !avatar.is_grounded() {
        return None;
    }

    let speed = state.speed();
    let horizon = speed * LOOKAHEAD_SECS + LOW_BARRIER_REACH;
    let current = avatar.lane;
    let neighbours = [current.shifted(-1), current.shifted(1)];

    if let Some((kind, distance)) = nearest_obstacle(state, current, horizon) {
        let escape = neighbours
            .into_iter()
            .filter(|&lane| lane != current && lane_is_clear(state, lane, horizon))
            .max_by_key(|&lane| tokens_ahead(state, lane, horizon));
        if let Some(lane) = escape {
            return Some(if lane < current {
                Action::Left
            } else {
                Action::Right
            });
        }

        return match kind {
            EntityKind::LowBarrier if distance <= LOW_BARRIER_REACH + speed * 0.12 => {
                Some(Action::Up)
            }
            EntityKind::OverheadBarrier if distance <= OVERHEAD_REACH + speed * 0.1 => {
                Some(Action::Down)
            }
            _ => None,
        };
    }

    // Nothing in the way: drift toward a safe lane with more tokens
    let here = tokens_ahead(state, current, horizon);
    neighbours
        .into_iter()
        .filter(|&lane| lane != current && lane_is_clear(state, lane, horizon))
        .find(|&lane| tokens_ahead(state, lane, horizon) > here)
        .map(|lane| {
            if lane < current {
                Action::Left
            } else {
                Action::Right
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::tick::{TickInput, place_entity, tick};
    use crate::tuning::Tuning;

    fn quiet_running() -> GameState {
        let tuning = Tuning {
            spawn_interval_base_ms: 1.0e9,
            spawn_interval_floor_ms: 1.0e9,
            ..Default::default()
        };
        let mut state = GameState::new(5, tuning, 0);
        tick(&mut state, &TickInput::with(Action::Confirm), 0.0);
        state
    }

    fn drive(state: &mut GameState, seconds: f32) {
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            let input = decide(state).map(TickInput::with).unwrap_or_default();
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_starts_from_idle() {
        let state = GameState::new(5, Tuning::default(), 0);
        assert_eq!(decide(&state), Some(Action::Confirm));
    }

    #[test]
    fn test_dodges_into_clear_lane() {
        let mut state = quiet_running();
        place_entity(&mut state, EntityKind::LowBarrier, Lane::CENTER, 1100.0);
        place_entity(&mut state, EntityKind::LowBarrier, Lane::LEFT, 1100.0);
        assert_eq!(decide(&state), Some(Action::Right));
    }

    #[test]
    fn test_jumps_when_boxed_in() {
        let mut state = quiet_running();
        for lane in Lane::all() {
            place_entity(&mut state, EntityKind::LowBarrier, lane, 900.0);
        }
        drive(&mut state, 1.5);
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_slides_when_boxed_in() {
        let mut state = quiet_running();
        place_entity(&mut state, EntityKind::LowBarrier, Lane::LEFT, 900.0);
        place_entity(&mut state, EntityKind::OverheadBarrier, Lane::CENTER, 900.0);
        place_entity(&mut state, EntityKind::LowBarrier, Lane::RIGHT, 900.0);
        drive(&mut state, 1.5);
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_idle_when_nothing_around() {
        let state = quiet_running();
        assert_eq!(decide(&state), None);
    }
}
