//! Timed power-up effects
//!
//! Four independent effects: slow motion, double score, shield, time
//! freeze. Re-activating an active effect restarts its duration instead of
//! stacking. Expiry timers run on the unscaled clock so a duration is
//! never stretched by the very slowdown the effect imposes.
//!
//! The shared world time scale is derived, never restored: whenever the
//! active set changes we recompute it from scratch, with time freeze taking
//! priority over slow motion. An expiry can therefore never clobber an
//! unrelated still-active effect.

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, PowerUpKind, TimerEvent};
use super::timer::{ClockKind, TimerHandle, TimerQueue};
use crate::config::GameConfig;

/// Per-effect activation state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct PowerUpEffect {
    active: bool,
    /// Pending expiry, at most one per effect; Shield never has one
    expiry: Option<TimerHandle>,
}

/// State machines for the four effect types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpController {
    slow_motion: PowerUpEffect,
    double_score: PowerUpEffect,
    shield: PowerUpEffect,
    time_freeze: PowerUpEffect,
    slow_motion_scale: f32,
}

impl PowerUpController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            slow_motion: PowerUpEffect::default(),
            double_score: PowerUpEffect::default(),
            shield: PowerUpEffect::default(),
            time_freeze: PowerUpEffect::default(),
            slow_motion_scale: config.slow_motion_scale,
        }
    }

    fn effect(&self, kind: PowerUpKind) -> &PowerUpEffect {
        match kind {
            PowerUpKind::SlowMotion => &self.slow_motion,
            PowerUpKind::DoubleScore => &self.double_score,
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::TimeFreeze => &self.time_freeze,
        }
    }

    fn effect_mut(&mut self, kind: PowerUpKind) -> &mut PowerUpEffect {
        match kind {
            PowerUpKind::SlowMotion => &mut self.slow_motion,
            PowerUpKind::DoubleScore => &mut self.double_score,
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::TimeFreeze => &mut self.time_freeze,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effect(kind).active
    }

    /// Effective world time scale from the currently active effects
    ///
    /// Time freeze wins over slow motion; with neither active the world
    /// runs at normal speed.
    pub fn time_scale(&self) -> f32 {
        if self.time_freeze.active {
            0.0
        } else if self.slow_motion.active {
            self.slow_motion_scale
        } else {
            1.0
        }
    }

    /// Activate an effect, restarting its duration if already running
    ///
    /// Shield ignores `duration`: it stays active until consumed.
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        duration: f32,
        timers: &mut TimerQueue<TimerEvent>,
        events: &mut Vec<GameEvent>,
    ) {
        if kind == PowerUpKind::Shield {
            self.shield.active = true;
            events.push(GameEvent::PowerUpActivated {
                kind,
                duration: 0.0,
            });
            return;
        }

        let effect = self.effect_mut(kind);
        if let Some(handle) = effect.expiry.take() {
            timers.cancel(handle);
            log::debug!("{} re-activated, duration restarted", kind.as_str());
        }
        effect.active = true;
        effect.expiry = Some(timers.schedule(
            duration,
            ClockKind::Unscaled,
            TimerEvent::PowerUpExpired(kind),
        ));
        events.push(GameEvent::PowerUpActivated { kind, duration });
    }

    /// Handle an expiry timer firing; the handle is already spent
    pub(crate) fn on_expired(&mut self, kind: PowerUpKind, events: &mut Vec<GameEvent>) {
        let effect = self.effect_mut(kind);
        if !effect.active {
            return;
        }
        effect.active = false;
        effect.expiry = None;
        events.push(GameEvent::PowerUpDeactivated(kind));
    }

    /// Consume the shield on a damaging event
    ///
    /// Returns true if the shield was active and absorbed the damage.
    pub fn consume_shield(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.shield.active {
            return false;
        }
        self.shield.active = false;
        events.push(GameEvent::PowerUpDeactivated(PowerUpKind::Shield));
        true
    }

    /// Deactivate everything without notifications (session teardown)
    pub fn reset(&mut self, timers: &mut TimerQueue<TimerEvent>) {
        for kind in [
            PowerUpKind::SlowMotion,
            PowerUpKind::DoubleScore,
            PowerUpKind::Shield,
            PowerUpKind::TimeFreeze,
        ] {
            let effect = self.effect_mut(kind);
            effect.active = false;
            if let Some(handle) = effect.expiry.take() {
                timers.cancel(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (PowerUpController, TimerQueue<TimerEvent>, Vec<GameEvent>) {
        let config = GameConfig::default();
        (PowerUpController::new(&config), TimerQueue::new(), Vec::new())
    }

    #[test]
    fn test_activation_restarts_duration_no_stacking() {
        let (mut powerups, mut timers, mut events) = controller();

        powerups.activate(PowerUpKind::SlowMotion, 4.0, &mut timers, &mut events);
        // 3 seconds in, re-activate for 2 more
        assert!(timers.advance(0.0, 3.0).is_empty());
        powerups.activate(PowerUpKind::SlowMotion, 2.0, &mut timers, &mut events);
        assert_eq!(timers.len(), 1);

        // Old expiry (1s away) must not fire
        assert!(timers.advance(0.0, 1.5).is_empty());
        assert!(powerups.is_active(PowerUpKind::SlowMotion));

        let fired = timers.advance(0.0, 0.5);
        assert_eq!(fired, vec![TimerEvent::PowerUpExpired(PowerUpKind::SlowMotion)]);
        powerups.on_expired(PowerUpKind::SlowMotion, &mut events);
        assert!(!powerups.is_active(PowerUpKind::SlowMotion));

        // Exactly one deactivation across the whole sequence
        let deactivations = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpDeactivated(_)))
            .count();
        assert_eq!(deactivations, 1);
    }

    #[test]
    fn test_time_scale_priority_freeze_over_slow() {
        let (mut powerups, mut timers, mut events) = controller();
        assert_eq!(powerups.time_scale(), 1.0);

        powerups.activate(PowerUpKind::SlowMotion, 5.0, &mut timers, &mut events);
        assert_eq!(powerups.time_scale(), 0.5);

        powerups.activate(PowerUpKind::TimeFreeze, 2.0, &mut timers, &mut events);
        assert_eq!(powerups.time_scale(), 0.0);

        // Freeze expires while slow motion still runs: scale falls back to
        // the slow-motion value, not to normal speed
        powerups.on_expired(PowerUpKind::TimeFreeze, &mut events);
        assert_eq!(powerups.time_scale(), 0.5);

        powerups.on_expired(PowerUpKind::SlowMotion, &mut events);
        assert_eq!(powerups.time_scale(), 1.0);
    }

    #[test]
    fn test_double_score_has_no_time_effect() {
        let (mut powerups, mut timers, mut events) = controller();
        powerups.activate(PowerUpKind::DoubleScore, 5.0, &mut timers, &mut events);
        assert_eq!(powerups.time_scale(), 1.0);
        assert!(powerups.is_active(PowerUpKind::DoubleScore));
    }

    #[test]
    fn test_shield_has_no_expiry_and_consumes_once() {
        let (mut powerups, mut timers, mut events) = controller();
        powerups.activate(PowerUpKind::Shield, 99.0, &mut timers, &mut events);
        assert!(timers.is_empty());
        assert_eq!(
            events.last(),
            Some(&GameEvent::PowerUpActivated {
                kind: PowerUpKind::Shield,
                duration: 0.0
            })
        );

        assert!(powerups.consume_shield(&mut events));
        assert!(!powerups.is_active(PowerUpKind::Shield));
        assert!(!powerups.consume_shield(&mut events));
    }

    #[test]
    fn test_independent_effects_do_not_interfere() {
        let (mut powerups, mut timers, mut events) = controller();
        powerups.activate(PowerUpKind::SlowMotion, 5.0, &mut timers, &mut events);
        powerups.activate(PowerUpKind::DoubleScore, 2.0, &mut timers, &mut events);

        let fired = timers.advance(0.0, 2.0);
        assert_eq!(fired, vec![TimerEvent::PowerUpExpired(PowerUpKind::DoubleScore)]);
        powerups.on_expired(PowerUpKind::DoubleScore, &mut events);

        assert!(powerups.is_active(PowerUpKind::SlowMotion));
        assert!(!powerups.is_active(PowerUpKind::DoubleScore));
    }
}
