//! Game tuning configuration
//!
//! All numeric knobs for the core live here so hosts can load balance data
//! from JSON instead of recompiling. Validation is strict and fatal at
//! setup: a bad threshold ordering or a non-positive duration is reported,
//! never silently clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{PowerUpKind, TargetKind};

/// Configuration rejected at setup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("combo thresholds must be strictly increasing (got x2={x2}, x3={x3}, x5={x5})")]
    ComboThresholdOrder { x2: u32, x3: u32, x5: u32 },
    #[error("score thresholds must satisfy easy < medium < hard (got {easy}, {medium}, {hard})")]
    ScoreThresholdOrder { easy: u32, medium: u32, hard: u32 },
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("spawn interval bounds inverted (min {min} > max {max})")]
    IntervalBounds { min: f32, max: f32 },
    #[error("start spawn interval {start} outside bounds [{min}, {max}]")]
    StartIntervalOutOfBounds { start: f32, min: f32, max: f32 },
    #[error("slow motion scale must be in (0, 1) (got {0})")]
    SlowMotionScale(f32),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Combo count thresholds for each multiplier tier
///
/// Must be strictly increasing; the multiplier for a count is the highest
/// tier whose threshold is <= count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboThresholds {
    /// Count at which the x2 multiplier starts
    pub x2: u32,
    /// Count at which the x3 multiplier starts
    pub x3: u32,
    /// Count at which the x5 multiplier starts
    pub x5: u32,
}

impl Default for ComboThresholds {
    fn default() -> Self {
        Self {
            x2: COMBO_X2_THRESHOLD,
            x3: COMBO_X3_THRESHOLD,
            x5: COMBO_X5_THRESHOLD,
        }
    }
}

/// One weighted entry in the spawn table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCandidate {
    pub kind: TargetKind,
    /// Base points awarded (or deducted) when the target is resolved
    pub point_value: u32,
    /// Relative weight for the spawn draw; zero disables the entry
    pub weight: u32,
}

/// Complete tuning block for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fastest the spawn loop is allowed to run (seconds between spawns)
    pub min_spawn_interval: f32,
    /// Slowest the spawn loop is allowed to run
    pub max_spawn_interval: f32,
    /// Interval a fresh session starts at
    pub start_spawn_interval: f32,

    /// Seconds of game time a combo survives without a new hit
    pub combo_time_window: f32,
    pub combo_thresholds: ComboThresholds,

    /// Score below which difficulty relaxes
    pub easy_score_threshold: u32,
    /// Score at which difficulty starts tightening gently
    pub medium_score_threshold: u32,
    /// Score at which difficulty tightens at full speed
    pub hard_score_threshold: u32,
    /// Interval change rate, in seconds of interval per second of game time
    pub difficulty_adjust_speed: f32,

    /// Duration of the slow-motion effect (wall-clock seconds)
    pub slow_motion_duration: f32,
    /// Duration of the double-score effect
    pub double_score_duration: f32,
    /// Duration of the time-freeze effect
    pub time_freeze_duration: f32,
    /// World speed while slow motion is active, in (0, 1)
    pub slow_motion_scale: f32,

    /// Weighted table the spawn loop draws from; empty table disables
    /// spawning (logged and skipped, never fatal)
    pub spawn_candidates: Vec<SpawnCandidate>,
    /// Seed for the deterministic spawn draw
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            max_spawn_interval: MAX_SPAWN_INTERVAL,
            start_spawn_interval: START_SPAWN_INTERVAL,
            combo_time_window: COMBO_TIME_WINDOW,
            combo_thresholds: ComboThresholds::default(),
            easy_score_threshold: EASY_SCORE_THRESHOLD,
            medium_score_threshold: MEDIUM_SCORE_THRESHOLD,
            hard_score_threshold: HARD_SCORE_THRESHOLD,
            difficulty_adjust_speed: DIFFICULTY_ADJUST_SPEED,
            slow_motion_duration: SLOW_MOTION_DURATION,
            double_score_duration: DOUBLE_SCORE_DURATION,
            time_freeze_duration: TIME_FREEZE_DURATION,
            slow_motion_scale: SLOW_MOTION_SCALE,
            spawn_candidates: default_spawn_table(),
            rng_seed: 0,
        }
    }
}

/// Stock spawn table: mostly good targets with occasional hazards and
/// power-ups
pub fn default_spawn_table() -> Vec<SpawnCandidate> {
    vec![
        SpawnCandidate {
            kind: TargetKind::Good,
            point_value: 1,
            weight: 50,
        },
        SpawnCandidate {
            kind: TargetKind::Bad,
            point_value: 2,
            weight: 12,
        },
        SpawnCandidate {
            kind: TargetKind::Bomb,
            point_value: 5,
            weight: 5,
        },
        SpawnCandidate {
            kind: TargetKind::Moving,
            point_value: 3,
            weight: 10,
        },
        SpawnCandidate {
            kind: TargetKind::Tiny,
            point_value: 5,
            weight: 8,
        },
        SpawnCandidate {
            kind: TargetKind::Giant,
            point_value: 1,
            weight: 7,
        },
        SpawnCandidate {
            kind: TargetKind::PowerUp(PowerUpKind::SlowMotion),
            point_value: 0,
            weight: 2,
        },
        SpawnCandidate {
            kind: TargetKind::PowerUp(PowerUpKind::DoubleScore),
            point_value: 0,
            weight: 2,
        },
        SpawnCandidate {
            kind: TargetKind::PowerUp(PowerUpKind::Shield),
            point_value: 0,
            weight: 2,
        },
        SpawnCandidate {
            kind: TargetKind::PowerUp(PowerUpKind::TimeFreeze),
            point_value: 0,
            weight: 2,
        },
    ]
}

impl GameConfig {
    /// Check every invariant the core relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("min_spawn_interval", self.min_spawn_interval),
            ("max_spawn_interval", self.max_spawn_interval),
            ("start_spawn_interval", self.start_spawn_interval),
            ("combo_time_window", self.combo_time_window),
            ("difficulty_adjust_speed", self.difficulty_adjust_speed),
            ("slow_motion_duration", self.slow_motion_duration),
            ("double_score_duration", self.double_score_duration),
            ("time_freeze_duration", self.time_freeze_duration),
        ];
        for (name, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.min_spawn_interval > self.max_spawn_interval {
            return Err(ConfigError::IntervalBounds {
                min: self.min_spawn_interval,
                max: self.max_spawn_interval,
            });
        }
        if self.start_spawn_interval < self.min_spawn_interval
            || self.start_spawn_interval > self.max_spawn_interval
        {
            return Err(ConfigError::StartIntervalOutOfBounds {
                start: self.start_spawn_interval,
                min: self.min_spawn_interval,
                max: self.max_spawn_interval,
            });
        }

        let t = self.combo_thresholds;
        if !(t.x2 < t.x3 && t.x3 < t.x5) {
            return Err(ConfigError::ComboThresholdOrder {
                x2: t.x2,
                x3: t.x3,
                x5: t.x5,
            });
        }

        if !(self.easy_score_threshold < self.medium_score_threshold
            && self.medium_score_threshold < self.hard_score_threshold)
        {
            return Err(ConfigError::ScoreThresholdOrder {
                easy: self.easy_score_threshold,
                medium: self.medium_score_threshold,
                hard: self.hard_score_threshold,
            });
        }

        if !(self.slow_motion_scale > 0.0 && self.slow_motion_scale < 1.0) {
            return Err(ConfigError::SlowMotionScale(self.slow_motion_scale));
        }

        Ok(())
    }

    /// Parse and validate a JSON tuning block
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Configured duration for a timed power-up (Shield has none)
    pub fn power_up_duration(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::SlowMotion => self.slow_motion_duration,
            PowerUpKind::DoubleScore => self.double_score_duration,
            PowerUpKind::TimeFreeze => self.time_freeze_duration,
            PowerUpKind::Shield => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_increasing_combo_thresholds_rejected() {
        let mut config = GameConfig::default();
        config.combo_thresholds = ComboThresholds { x2: 5, x3: 5, x5: 10 };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ComboThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_unordered_score_thresholds_rejected() {
        let mut config = GameConfig::default();
        config.medium_score_threshold = config.hard_score_threshold;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScoreThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let mut config = GameConfig::default();
        config.time_freeze_duration = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "time_freeze_duration",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_bound_rejected() {
        let mut config = GameConfig::default();
        config.min_spawn_interval = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_inverted_interval_bounds_rejected() {
        let mut config = GameConfig::default();
        config.min_spawn_interval = 3.0;
        config.max_spawn_interval = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalBounds { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = GameConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = GameConfig::from_json_str(r#"{"rng_seed": 42}"#).unwrap();
        assert_eq!(parsed.rng_seed, 42);
        assert_eq!(parsed.combo_time_window, GameConfig::default().combo_time_window);
    }
}
