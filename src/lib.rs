//! Lane Runner - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, difficulty ramp, spawning, run state)
//! - `input`: Logical gestures and their mapping to run actions
//! - `session`: Adapter that wires the simulation to persistence and presentation
//! - `persistence`: Best-score storage port and its backends
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (volume, reduced motion, cosmetic toggles)
//! - `audio`: Sound cues for game events
//! - `platform`: Seed selection and browser bindings

pub mod audio;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::{Action, Gesture};
pub use session::{Presenter, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz); host frames are split into steps no longer than this
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted from a host loop before clamping
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical playfield width (across the road)
    pub const FIELD_WIDTH: f32 = 900.0;
    /// Logical playfield height (along the forward axis)
    pub const FIELD_HEIGHT: f32 = 1600.0;

    /// Share of the field width taken by the road
    pub const ROAD_WIDTH_FRACTION: f32 = 0.86;
    /// Road width cap on wide fields
    pub const ROAD_MAX_WIDTH: f32 = 680.0;

    /// Forward-axis position of the runner (entities travel toward it)
    pub const PLAYER_Y: f32 = FIELD_HEIGHT * 0.78;
    /// Forward-axis position new entities enter at (beyond the visible field)
    pub const SPAWN_Y: f32 = -120.0;
    /// Entities past `FIELD_HEIGHT + DESPAWN_MARGIN` are destroyed
    pub const DESPAWN_MARGIN: f32 = 200.0;
    /// Gap between consecutive tokens in a token run
    pub const TOKEN_SPACING: f32 = 90.0;

    /// Lane change tween duration (seconds)
    pub const LANE_TWEEN_SECS: f32 = 0.09;
}

/// Linear interpolation from `a` (t=0) to `b` (t=1)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
