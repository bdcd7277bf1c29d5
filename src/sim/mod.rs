//! Deterministic game-state core
//!
//! All gameplay state lives here. This module must be pure and deterministic:
//! - Driven only by inbound interaction events and `tick(dt)`
//! - Seeded RNG only
//! - Single logical thread, no locking
//! - No rendering or platform dependencies

pub mod combo;
pub mod difficulty;
pub mod events;
pub mod powerup;
pub mod state;
pub mod timer;

pub use combo::ComboTracker;
pub use difficulty::DifficultyController;
pub use events::{GameEvent, Observers, PowerUpKind, Subscription, TargetKind, TimerEvent};
pub use powerup::PowerUpController;
pub use state::{GameCore, GameSnapshot};
pub use timer::{ClockKind, TimerHandle, TimerQueue};
