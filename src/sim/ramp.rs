//! Difficulty ramp
//!
//! Speed climbs linearly with run time up to a cap. Every "the run gets
//! harder" knob is a linear interpolation of normalized progress `t`, which
//! is derived from speed rather than wall-clock time.

use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::Tuning;

/// Speed and elapsed time for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRamp {
    /// Current forward speed (units/s)
    pub speed: f32,
    /// Seconds spent running this run
    pub elapsed: f32,
}

impl DifficultyRamp {
    /// Fresh ramp at base speed
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.base_speed,
            elapsed: 0.0,
        }
    }

    /// Advance the ramp by `dt` seconds. Speed never decreases.
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        self.elapsed += dt;
        self.speed = (self.speed + tuning.ramp_rate * dt)
            .min(tuning.max_speed)
            .max(tuning.base_speed);
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self, tuning: &Tuning) -> f32 {
        progress(self.speed, tuning)
    }
}

/// Speed after `elapsed` seconds of running
pub fn speed_at(elapsed: f32, tuning: &Tuning) -> f32 {
    (tuning.base_speed + tuning.ramp_rate * elapsed.max(0.0)).min(tuning.max_speed)
}

/// Normalized progress `t = clamp((speed - base) / (max - base), 0, 1)`
pub fn progress(speed: f32, tuning: &Tuning) -> f32 {
    let span = tuning.max_speed - tuning.base_speed;
    if span <= 0.0 {
        return 1.0;
    }
    ((speed - tuning.base_speed) / span).clamp(0.0, 1.0)
}

/// Delay before the next spawn at progress `t` (ms)
pub fn spawn_interval_ms(t: f32, tuning: &Tuning) -> f32 {
    lerp(
        tuning.spawn_interval_base_ms,
        tuning.spawn_interval_floor_ms,
        t.clamp(0.0, 1.0),
    )
    .max(tuning.spawn_interval_floor_ms)
}

/// Chance that a spawn is an obstacle pattern rather than tokens
pub fn obstacle_chance(t: f32, tuning: &Tuning) -> f32 {
    lerp(tuning.obstacle_chance_start, tuning.obstacle_chance_end, t)
}

/// Chance that a single obstacle is a low barrier
pub fn low_barrier_chance(t: f32, tuning: &Tuning) -> f32 {
    lerp(
        tuning.low_barrier_chance_start,
        tuning.low_barrier_chance_end,
        t,
    )
}

/// Chance of a two-lane block; zero until progress passes the unlock point
pub fn multi_block_chance(t: f32, tuning: &Tuning) -> f32 {
    if t > tuning.multi_block_min_progress {
        tuning.multi_block_chance
    } else {
        0.0
    }
}

/// Seconds between footsteps
pub fn footstep_interval(t: f32, tuning: &Tuning) -> f32 {
    lerp(
        tuning.footstep_interval_start,
        tuning.footstep_interval_end,
        t,
    )
}

/// Opacity of the speed-line overlay
pub fn speed_line_alpha(t: f32, tuning: &Tuning) -> f32 {
    lerp(0.0, tuning.speed_line_alpha_max, t)
}
