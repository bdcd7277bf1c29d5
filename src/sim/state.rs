//! Session state and the core aggregate
//!
//! `GameCore` owns the score ledger, the active flag, the sub-controllers
//! and their shared timer queue, the spawn loop, and the observer registry.
//! It is constructed once by the host and passed by reference to the
//! target/interaction and presentation layers; there is no global instance.
//!
//! All state transitions happen on one logical simulation thread: inbound
//! interaction events are plain method calls, and timers fire only from
//! inside `tick`. Once a session ends, every mutating call is a silent
//! no-op until `start_session` builds a fresh session.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboTracker;
use super::difficulty::DifficultyController;
use super::events::{GameEvent, Observers, PowerUpKind, Subscription, TimerEvent};
use super::powerup::PowerUpController;
use super::timer::{ClockKind, TimerHandle, TimerQueue};
use crate::config::{ConfigError, GameConfig};

/// Read-only view of the live session for hosts and debug overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub score: u32,
    pub active: bool,
    pub combo_count: u32,
    pub combo_multiplier: u32,
    pub spawn_interval: f32,
    pub time_scale: f32,
}

/// The game-state and timing engine
pub struct GameCore {
    config: GameConfig,
    score: u32,
    active: bool,
    combo: ComboTracker,
    difficulty: DifficultyController,
    powerups: PowerUpController,
    timers: TimerQueue<TimerEvent>,
    spawn_timer: Option<TimerHandle>,
    rng: Pcg32,
    observers: Observers,
    /// Emission buffer; drained to observers at the end of every inbound
    /// call so a notification never interleaves with a half-applied change
    pending: Vec<GameEvent>,
}

impl GameCore {
    /// Build a core from validated configuration
    ///
    /// The session starts inactive; call `start_session` to begin play.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let combo = ComboTracker::new(&config);
        let difficulty = DifficultyController::new(&config);
        let powerups = PowerUpController::new(&config);
        let rng = Pcg32::seed_from_u64(config.rng_seed);
        Ok(Self {
            config,
            score: 0,
            active: false,
            combo,
            difficulty,
            powerups,
            timers: TimerQueue::new(),
            spawn_timer: None,
            rng,
            observers: Observers::new(),
            pending: Vec::new(),
        })
    }

    // --- session lifecycle ---

    /// Start (or restart) a session with fresh state
    pub fn start_session(&mut self) {
        self.score = 0;
        self.active = true;
        self.timers.clear();
        self.combo = ComboTracker::new(&self.config);
        self.difficulty.reset();
        self.powerups.reset(&mut self.timers);
        self.rng = Pcg32::seed_from_u64(self.config.rng_seed);
        self.spawn_timer = Some(self.timers.schedule(
            self.difficulty.current_interval(),
            ClockKind::Scaled,
            TimerEvent::SpawnTick,
        ));
        log::info!(
            "session started (spawn interval {:.2}s)",
            self.difficulty.current_interval()
        );
    }

    /// End the session from the host side; same path as a game over
    pub fn stop_session(&mut self) {
        if self.active {
            log::info!("session stopped by host");
        }
        self.game_over();
        self.drain_events();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo_count(&self) -> u32 {
        self.combo.count()
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.combo.multiplier()
    }

    pub fn spawn_interval(&self) -> f32 {
        self.difficulty.current_interval()
    }

    pub fn time_scale(&self) -> f32 {
        self.powerups.time_scale()
    }

    pub fn is_power_up_active(&self, kind: PowerUpKind) -> bool {
        self.powerups.is_active(kind)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            active: self.active,
            combo_count: self.combo.count(),
            combo_multiplier: self.combo.multiplier(),
            spawn_interval: self.difficulty.current_interval(),
            time_scale: self.powerups.time_scale(),
        }
    }

    // --- observers ---

    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) -> Subscription {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, sub: Subscription) {
        self.observers.unsubscribe(sub);
    }

    // --- inbound interaction events ---

    /// A good target was hit
    pub fn hit_good(&mut self, points: u32) {
        if !self.active {
            return;
        }
        self.combo.register_hit(&mut self.timers, &mut self.pending);
        self.add_score(points as i64);
        self.difficulty.on_good_hit();
        self.drain_events();
    }

    /// A special target was hit; its own multiplier applies to the base
    /// points before the combo multiplier
    pub fn hit_special(&mut self, points: u32, multiplier: u32) {
        if !self.active {
            return;
        }
        self.combo.register_hit(&mut self.timers, &mut self.pending);
        self.add_score(points as i64 * multiplier as i64);
        self.difficulty.on_good_hit();
        self.drain_events();
    }

    /// A bad target was hit: combo breaks, points are lost
    pub fn hit_bad(&mut self, points: u32) {
        if !self.active {
            return;
        }
        self.combo.reset(&mut self.timers, &mut self.pending);
        self.decrease_score(points);
        self.difficulty.on_miss();
        self.drain_events();
    }

    /// A bomb was hit: combo breaks, heavy point loss
    pub fn hit_bomb(&mut self, points: u32) {
        if !self.active {
            return;
        }
        self.combo.reset(&mut self.timers, &mut self.pending);
        self.decrease_score(points);
        self.difficulty.on_miss();
        self.drain_events();
    }

    /// A good target expired without being hit
    pub fn miss_good(&mut self, points: u32) {
        if !self.active {
            return;
        }
        self.combo.reset(&mut self.timers, &mut self.pending);
        self.decrease_score(points);
        self.difficulty.on_miss();
        self.drain_events();
    }

    /// A power-up target was hit
    pub fn hit_power_up(&mut self, kind: PowerUpKind, duration: f32) {
        if !self.active {
            return;
        }
        self.powerups
            .activate(kind, duration, &mut self.timers, &mut self.pending);
        self.difficulty.on_good_hit();
        self.drain_events();
    }

    // --- simulation tick ---

    /// Advance the core by one frame of real time
    ///
    /// Applies the current time scale, runs the difficulty controller on
    /// game time, and fires due timers. Timer payloads never run inside
    /// the call that scheduled them, only here.
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let scaled_dt = dt * self.powerups.time_scale();
        self.difficulty
            .tick(scaled_dt, self.score, self.combo.count());

        let fired = self.timers.advance(scaled_dt, dt);
        for payload in fired {
            if !self.active {
                break;
            }
            self.dispatch_timer(payload);
        }
        self.drain_events();
    }

    fn dispatch_timer(&mut self, payload: TimerEvent) {
        match payload {
            TimerEvent::ComboDecay => {
                self.combo.on_decay(&mut self.timers, &mut self.pending);
            }
            TimerEvent::PowerUpExpired(kind) => {
                self.powerups.on_expired(kind, &mut self.pending);
            }
            TimerEvent::SpawnTick => {
                self.request_spawn();
                self.spawn_timer = Some(self.timers.schedule(
                    self.difficulty.current_interval(),
                    ClockKind::Scaled,
                    TimerEvent::SpawnTick,
                ));
            }
        }
    }

    /// Weighted draw from the spawn table; empty or all-zero tables skip
    /// the cycle without ending the loop
    fn request_spawn(&mut self) {
        let total: u32 = self.config.spawn_candidates.iter().map(|c| c.weight).sum();
        if total == 0 {
            log::warn!("no spawn candidates configured, skipping spawn cycle");
            return;
        }
        let mut roll = self.rng.random_range(0..total);
        for candidate in &self.config.spawn_candidates {
            if roll < candidate.weight {
                self.pending.push(GameEvent::TargetRequested {
                    kind: candidate.kind,
                    point_value: candidate.point_value,
                });
                return;
            }
            roll -= candidate.weight;
        }
    }

    // --- score ledger ---

    /// Apply a score gain: base times combo multiplier, doubled under the
    /// double-score effect, never below zero
    fn add_score(&mut self, base: i64) {
        let mut earned = base * self.combo.multiplier() as i64;
        if self.powerups.is_active(PowerUpKind::DoubleScore) {
            earned *= 2;
        }
        self.score = (self.score as i64 + earned).clamp(0, u32::MAX as i64) as u32;
        self.pending.push(GameEvent::ScoreChanged(self.score));
        if self.score == 0 {
            self.game_over();
        }
    }

    /// Apply a score loss; an active shield absorbs it entirely
    ///
    /// Multipliers never apply on the way down.
    fn decrease_score(&mut self, amount: u32) {
        if self.powerups.consume_shield(&mut self.pending) {
            log::debug!("shield absorbed {} damage", amount);
            return;
        }
        self.score = self.score.saturating_sub(amount);
        self.pending.push(GameEvent::ScoreChanged(self.score));
        if self.score == 0 {
            self.game_over();
        }
    }

    /// End the session; idempotent, notifies exactly once
    fn game_over(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(handle) = self.spawn_timer.take() {
            self.timers.cancel(handle);
        }
        // Remaining decay/expiry timers are inert: tick no-ops while the
        // session is inactive and start_session clears the queue
        self.pending.push(GameEvent::GameOver);
        log::info!("game over at score {}", self.score);
    }

    fn drain_events(&mut self) {
        while !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            for event in &batch {
                self.observers.notify(event);
            }
        }
    }
}

impl std::fmt::Debug for GameCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameCore")
            .field("score", &self.score)
            .field("active", &self.active)
            .field("combo", &self.combo)
            .field("difficulty", &self.difficulty)
            .field("powerups", &self.powerups)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}
