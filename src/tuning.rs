//! Data-driven game balance
//!
//! Every constant that shapes difficulty lives here so a run can be retuned
//! from a JSON file without rebuilding. Missing fields fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Balance constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty ramp ===
    /// Forward speed at the start of a run (units/s)
    pub base_speed: f32,
    /// Speed cap (units/s)
    pub max_speed: f32,
    /// Linear speed gain (units/s²)
    pub ramp_rate: f32,

    // === Spawn cadence ===
    /// Spawn interval at progress 0 (ms)
    pub spawn_interval_base_ms: f32,
    /// Spawn interval at progress 1 (ms)
    pub spawn_interval_floor_ms: f32,

    // === Spawn odds ===
    pub obstacle_chance_start: f32,
    pub obstacle_chance_end: f32,
    /// Chance of a two-lane block once unlocked
    pub multi_block_chance: f32,
    /// Progress that must be exceeded before two-lane blocks appear
    pub multi_block_min_progress: f32,
    /// Chance a single obstacle is a low barrier (rest are overhead)
    pub low_barrier_chance_start: f32,
    pub low_barrier_chance_end: f32,
    pub token_run_min: u32,
    pub token_run_max: u32,

    // === Scoring ===
    pub token_value: f64,
    /// Passive score per unit travelled
    pub distance_score_rate: f64,

    // === Avatar ===
    /// Upward launch speed of a jump (units/s)
    pub jump_velocity: f32,
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    pub slide_duration_ms: f32,
    /// Pause between the fatal hit and the results screen
    pub results_delay_ms: f32,

    // === Cosmetic intensity ===
    pub footstep_interval_start: f32,
    pub footstep_interval_end: f32,
    pub speed_line_alpha_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 520.0,
            max_speed: 1800.0,
            ramp_rate: 6.0,

            spawn_interval_base_ms: 1200.0,
            spawn_interval_floor_ms: 520.0,

            obstacle_chance_start: 0.55,
            obstacle_chance_end: 0.82,
            multi_block_chance: 0.22,
            multi_block_min_progress: 0.35,
            low_barrier_chance_start: 0.75,
            low_barrier_chance_end: 0.55,
            token_run_min: 3,
            token_run_max: 6,

            token_value: 25.0,
            distance_score_rate: 0.03,

            jump_velocity: 1050.0,
            gravity: 2400.0,
            slide_duration_ms: 420.0,
            results_delay_ms: 180.0,

            footstep_interval_start: 0.34,
            footstep_interval_end: 0.18,
            speed_line_alpha_max: 0.22,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if !(self.base_speed > 0.0) {
            return invalid(format!("base_speed must be positive, got {}", self.base_speed));
        }
        if !(self.max_speed >= self.base_speed) {
            return invalid(format!(
                "max_speed {} is below base_speed {}",
                self.max_speed, self.base_speed
            ));
        }
        if !(self.ramp_rate >= 0.0) {
            return invalid(format!("ramp_rate must not be negative, got {}", self.ramp_rate));
        }
        if !(self.spawn_interval_floor_ms > 0.0)
            || self.spawn_interval_floor_ms > self.spawn_interval_base_ms
        {
            return invalid(format!(
                "spawn interval floor {} must be in (0, {}]",
                self.spawn_interval_floor_ms, self.spawn_interval_base_ms
            ));
        }

        let chances = [
            ("obstacle_chance_start", self.obstacle_chance_start),
            ("obstacle_chance_end", self.obstacle_chance_end),
            ("multi_block_chance", self.multi_block_chance),
            ("multi_block_min_progress", self.multi_block_min_progress),
            ("low_barrier_chance_start", self.low_barrier_chance_start),
            ("low_barrier_chance_end", self.low_barrier_chance_end),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be within [0, 1], got {value}"));
            }
        }

        if self.token_run_min == 0 || self.token_run_min > self.token_run_max {
            return invalid(format!(
                "token run range {}..={} is empty",
                self.token_run_min, self.token_run_max
            ));
        }
        if self.token_value < 0.0 || self.distance_score_rate < 0.0 {
            return invalid("score rates must not be negative".to_string());
        }
        if !(self.gravity > 0.0) || self.jump_velocity < 0.0 {
            return invalid("jump needs positive gravity and a non-negative impulse".to_string());
        }
        if self.slide_duration_ms < 0.0 || self.results_delay_ms < 0.0 {
            return invalid("delays must not be negative".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.base_speed, 520.0);
        assert_eq!(tuning.max_speed, 1800.0);
        assert_eq!(tuning.spawn_interval_floor_ms, 520.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "ramp_rate": 12.5, "token_run_max": 8 }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.ramp_rate, 12.5);
        assert_eq!(tuning.token_run_max, 8);
        assert_eq!(tuning.base_speed, 520.0);
    }

    #[test]
    fn test_rejects_inverted_speeds() {
        let err = Tuning::from_json(r#"{ "base_speed": 900.0, "max_speed": 600.0 }"#)
            .expect_err("inverted speeds must be rejected");
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_token_run() {
        let tuning = Tuning {
            token_run_min: 5,
            token_run_max: 2,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").expect_err("garbage must fail");
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/definitely/not/here/tuning.json").expect_err("missing file");
        assert!(matches!(err, TuningError::Io { .. }));
    }
}
