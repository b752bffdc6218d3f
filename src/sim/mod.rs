//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod lane;
pub mod ramp;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Band, Footprint, Rect};
pub use entity::{Entity, EntityKind, EntityTracker};
pub use lane::{LANE_COUNT, Lane, RoadGeometry, move_lane};
pub use ramp::DifficultyRamp;
pub use spawn::{SpawnPlan, SpawnScheduler, plan_spawn};
pub use state::{
    Avatar, DeferredAction, DespawnReason, GameEvent, GameState, MotionState, RunPhase,
    RunSummary,
};
pub use tick::{TickInput, place, place_at, place_entity, tick};
