//! Event types and the observer registry
//!
//! Inbound interaction events arrive as method calls on `GameCore`; this
//! module defines everything that flows the other way: the `GameEvent`
//! notifications presentation layers subscribe to, plus the internal timer
//! payloads the core schedules against the `TimerQueue`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Power-up effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// World runs at half speed
    SlowMotion,
    /// Score gains are doubled (no time effect)
    DoubleScore,
    /// Absorbs exactly one damaging event, then is consumed
    Shield,
    /// World time stops entirely
    TimeFreeze,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "SlowMotion",
            PowerUpKind::DoubleScore => "DoubleScore",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::TimeFreeze => "TimeFreeze",
        }
    }
}

/// Target varieties the spawn loop can request
///
/// The core never owns target entities; kinds exist so spawn requests and
/// interaction events can describe what the target layer should create or
/// what the player actually hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Good,
    Bad,
    PowerUp(PowerUpKind),
    Bomb,
    Moving,
    Tiny,
    Giant,
}

/// Outbound notifications, delivered synchronously and in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score changed; carries the new total
    ScoreChanged(u32),
    /// Session ended (emitted exactly once per session)
    GameOver,
    /// Combo count or multiplier tier changed
    ComboChanged { count: u32, multiplier: u32 },
    /// A timed effect started (Shield reports duration 0)
    PowerUpActivated { kind: PowerUpKind, duration: f32 },
    /// A timed effect expired or the shield was consumed
    PowerUpDeactivated(PowerUpKind),
    /// The spawn loop wants the target layer to create a new target
    TargetRequested { kind: TargetKind, point_value: u32 },
}

/// Timer payloads dispatched by `GameCore::tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Combo window elapsed without a hit
    ComboDecay,
    /// A timed power-up ran out
    PowerUpExpired(PowerUpKind),
    /// Spawn loop interval elapsed
    SpawnTick,
}

/// Handle returned by `Observers::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Observer registry with synchronous delivery
///
/// Replaces the source design's delegate `+=`/`-=` subscription: observers
/// are boxed closures keyed by an id. Events are delivered in emission
/// order; the order in which observers see a single event is unspecified.
pub struct Observers {
    subs: Vec<(u64, Box<dyn FnMut(&GameEvent)>)>,
    next_id: u64,
}

impl Observers {
    pub fn new() -> Self {
        Self {
            subs: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an observer; returns a handle for later removal
    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subs.push((id, Box::new(observer)));
        Subscription(id)
    }

    /// Remove an observer; no-op if already removed
    pub fn unsubscribe(&mut self, sub: Subscription) {
        self.subs.retain(|(id, _)| *id != sub.0);
    }

    /// Deliver one event to every registered observer
    pub fn notify(&mut self, event: &GameEvent) {
        for (_, observer) in &mut self.subs {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

impl Default for Observers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.subs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_notify() {
        let mut observers = Observers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        observers.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        observers.notify(&GameEvent::ScoreChanged(5));
        observers.notify(&GameEvent::GameOver);

        assert_eq!(
            *seen.borrow(),
            vec![GameEvent::ScoreChanged(5), GameEvent::GameOver]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut observers = Observers::new();
        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        let sub = observers.subscribe(move |_| *sink.borrow_mut() += 1);

        observers.notify(&GameEvent::GameOver);
        observers.unsubscribe(sub);
        observers.notify(&GameEvent::GameOver);
        // Unsubscribing twice is a no-op
        observers.unsubscribe(sub);

        assert_eq!(*count.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_multiple_observers_all_see_event() {
        let mut observers = Observers::new();
        let a = Rc::new(RefCell::new(0));
        let b = Rc::new(RefCell::new(0));

        let sink_a = Rc::clone(&a);
        let sink_b = Rc::clone(&b);
        observers.subscribe(move |_| *sink_a.borrow_mut() += 1);
        observers.subscribe(move |_| *sink_b.borrow_mut() += 1);

        observers.notify(&GameEvent::ScoreChanged(1));

        assert_eq!(*a.borrow(), 1);
        assert_eq!(*b.borrow(), 1);
    }
}
