//! Adaptive difficulty
//!
//! Feedback controller for the spawn interval: score level picks a base
//! adjustment each tick, combo streaks and miss streaks layer a second
//! adjustment on top, and the result is clamped to the configured bounds.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Miss streak length at which the relief rule kicks in
const MISS_RELIEF_STREAK: u32 = 3;

/// Per-tick spawn-interval controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyController {
    current_interval: f32,
    start_interval: f32,
    min_interval: f32,
    max_interval: f32,
    easy_threshold: u32,
    medium_threshold: u32,
    hard_threshold: u32,
    adjust_speed: f32,
    x5_combo_threshold: u32,
    consecutive_good: u32,
    consecutive_misses: u32,
}

/// Move `current` toward `target` by at most `rate * dt`, never overshooting
fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if current > target {
        (current - rate * dt).max(target)
    } else {
        (current + rate * dt).min(target)
    }
}

impl DifficultyController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            current_interval: config.start_spawn_interval,
            start_interval: config.start_spawn_interval,
            min_interval: config.min_spawn_interval,
            max_interval: config.max_spawn_interval,
            easy_threshold: config.easy_score_threshold,
            medium_threshold: config.medium_score_threshold,
            hard_threshold: config.hard_score_threshold,
            adjust_speed: config.difficulty_adjust_speed,
            x5_combo_threshold: config.combo_thresholds.x5,
            consecutive_good: 0,
            consecutive_misses: 0,
        }
    }

    pub fn current_interval(&self) -> f32 {
        self.current_interval
    }

    pub fn consecutive_good(&self) -> u32 {
        self.consecutive_good
    }

    pub fn consecutive_misses(&self) -> u32 {
        self.consecutive_misses
    }

    /// Back to session-start values
    pub fn reset(&mut self) {
        self.current_interval = self.start_interval;
        self.consecutive_good = 0;
        self.consecutive_misses = 0;
    }

    /// Called once per interaction event, never per tick
    pub fn on_good_hit(&mut self) {
        self.consecutive_good += 1;
        self.consecutive_misses = 0;
    }

    /// Called once per miss or bad/bomb hit
    pub fn on_miss(&mut self) {
        self.consecutive_misses += 1;
        self.consecutive_good = 0;
    }

    /// Advance the controller by one tick of game time
    ///
    /// Score rules are first-match-wins; the combo/miss-streak rules are
    /// independent and layered on top within the same tick.
    pub fn tick(&mut self, dt: f32, score: u32, combo_count: u32) {
        let speed = self.adjust_speed;

        if score >= self.hard_threshold {
            self.current_interval = approach(self.current_interval, self.min_interval, speed, dt);
        } else if score >= self.medium_threshold {
            self.current_interval = approach(
                self.current_interval,
                self.min_interval + 0.2,
                speed * 0.5,
                dt,
            );
        } else if score < self.easy_threshold {
            self.current_interval = approach(self.current_interval, self.max_interval, speed, dt);
        }

        if combo_count >= self.x5_combo_threshold {
            self.current_interval -= speed * 2.0 * dt;
        } else if combo_count == 0 && self.consecutive_misses >= MISS_RELIEF_STREAK {
            self.current_interval += speed * 1.5 * dt;
        }

        self.current_interval = self
            .current_interval
            .clamp(self.min_interval, self.max_interval);
    }
}
