//! Combo tracking
//!
//! Consecutive successful hits build a combo; the multiplier tier is
//! derived from the count via the configured thresholds. The combo decays
//! to zero if no hit lands within the rolling window. Decay runs on the
//! scaled clock: combo pressure stretches with slow motion and stops under
//! time freeze, while power-up durations do not.

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, TimerEvent};
use super::timer::{ClockKind, TimerHandle, TimerQueue};
use crate::config::{ComboThresholds, GameConfig};

/// Consecutive-hit tracker with window decay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboTracker {
    count: u32,
    multiplier: u32,
    window: f32,
    thresholds: ComboThresholds,
    /// At most one decay timer is pending at a time
    decay: Option<TimerHandle>,
}

impl ComboTracker {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            count: 0,
            multiplier: 1,
            window: config.combo_time_window,
            thresholds: config.combo_thresholds,
            decay: None,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Multiplier tier for a count: highest tier whose threshold is <= count
    fn tier_for(&self, count: u32) -> u32 {
        if count >= self.thresholds.x5 {
            5
        } else if count >= self.thresholds.x3 {
            3
        } else if count >= self.thresholds.x2 {
            2
        } else {
            1
        }
    }

    /// Record a successful hit: bump the count, recompute the tier, restart
    /// the decay window
    pub fn register_hit(
        &mut self,
        timers: &mut TimerQueue<TimerEvent>,
        events: &mut Vec<GameEvent>,
    ) {
        self.count += 1;
        self.multiplier = self.tier_for(self.count);

        if let Some(handle) = self.decay.take() {
            timers.cancel(handle);
        }
        self.decay = Some(timers.schedule(self.window, ClockKind::Scaled, TimerEvent::ComboDecay));

        events.push(GameEvent::ComboChanged {
            count: self.count,
            multiplier: self.multiplier,
        });
    }

    /// Drop the combo back to zero
    ///
    /// Always emits `ComboChanged`, even when already at zero; callers that
    /// don't want the redundant notification must pre-check `count() > 0`.
    pub fn reset(&mut self, timers: &mut TimerQueue<TimerEvent>, events: &mut Vec<GameEvent>) {
        self.count = 0;
        self.multiplier = 1;
        if let Some(handle) = self.decay.take() {
            timers.cancel(handle);
        }
        events.push(GameEvent::ComboChanged {
            count: 0,
            multiplier: 1,
        });
    }

    /// Handle the decay timer firing; the handle is already spent
    pub(crate) fn on_decay(
        &mut self,
        timers: &mut TimerQueue<TimerEvent>,
        events: &mut Vec<GameEvent>,
    ) {
        self.decay = None;
        self.reset(timers, events);
    }
}
