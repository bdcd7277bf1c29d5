//! Reflex Rush - game-state and timing core for an arcade reflex game
//!
//! Core modules:
//! - `sim`: Deterministic game state (score, combo, difficulty, power-ups,
//!   timers, spawn loop)
//! - `config`: Data-driven game balance with strict validation
//!
//! Rendering, physics, input capture, and presentation are external
//! collaborators: they push discrete interaction events into `GameCore`
//! and subscribe to the notifications it emits.

pub mod config;
pub mod sim;

pub use config::{ComboThresholds, ConfigError, GameConfig, SpawnCandidate};
pub use sim::{GameCore, GameEvent, GameSnapshot, PowerUpKind, Subscription, TargetKind};

/// Default tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Spawn interval bounds (seconds between spawn requests)
    pub const MIN_SPAWN_INTERVAL: f32 = 0.4;
    pub const MAX_SPAWN_INTERVAL: f32 = 2.0;
    pub const START_SPAWN_INTERVAL: f32 = 1.5;

    /// Combo window and multiplier tier thresholds
    pub const COMBO_TIME_WINDOW: f32 = 3.0;
    pub const COMBO_X2_THRESHOLD: u32 = 3;
    pub const COMBO_X3_THRESHOLD: u32 = 5;
    pub const COMBO_X5_THRESHOLD: u32 = 10;

    /// Score levels at which difficulty relaxes or tightens
    pub const EASY_SCORE_THRESHOLD: u32 = 20;
    pub const MEDIUM_SCORE_THRESHOLD: u32 = 50;
    pub const HARD_SCORE_THRESHOLD: u32 = 100;
    /// Interval change rate (seconds of interval per second of game time)
    pub const DIFFICULTY_ADJUST_SPEED: f32 = 0.1;

    /// Power-up effect durations (wall-clock seconds)
    pub const SLOW_MOTION_DURATION: f32 = 5.0;
    pub const DOUBLE_SCORE_DURATION: f32 = 5.0;
    pub const TIME_FREEZE_DURATION: f32 = 2.0;
    /// World speed while slow motion is active
    pub const SLOW_MOTION_SCALE: f32 = 0.5;
}
