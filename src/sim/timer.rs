//! Deferred timer scheduling
//!
//! Replaces the source design's coroutine timers with an explicit
//! schedule/cancel queue. Timers carry a payload instead of a callback so
//! the queue stays deterministic and serializable; `GameCore::tick` drains
//! due payloads and dispatches them. A scheduled payload never fires inside
//! the call that scheduled it, and cancellation is synchronous and total:
//! a cancelled handle can never fire.

use serde::{Deserialize, Serialize};

/// Opaque handle identifying a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// Which clock a timer counts down against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockKind {
    /// Game time: stretched by slow motion, stopped by time freeze
    Scaled,
    /// Wall time: immune to the time-scale effects
    Unscaled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<E> {
    handle: TimerHandle,
    clock: ClockKind,
    remaining: f32,
    payload: E,
}

/// Ordered queue of pending timers
///
/// Entries fire in schedule order when due in the same advance, matching
/// the delivery-order guarantee for same-tick firings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerQueue<E> {
    entries: Vec<Entry<E>>,
    next_handle: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 1,
        }
    }

    /// Schedule a payload to fire after `delay` on the given clock
    pub fn schedule(&mut self, delay: f32, clock: ClockKind, payload: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            clock,
            remaining: delay,
            payload,
        });
        handle
    }

    /// Cancel a pending timer; idempotent, no-op if already fired
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Whether a handle still refers to a pending timer
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advance both clocks and return the payloads that came due, in
    /// schedule order
    pub fn advance(&mut self, scaled_dt: f32, real_dt: f32) -> Vec<E> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            let entry = &mut self.entries[i];
            entry.remaining -= match entry.clock {
                ClockKind::Scaled => scaled_dt,
                ClockKind::Unscaled => real_dt,
            };
            if entry.remaining <= 0.0 {
                fired.push(self.entries.remove(i).payload);
            } else {
                i += 1;
            }
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due_not_before() {
        let mut queue: TimerQueue<&str> = TimerQueue::new();
        queue.schedule(1.0, ClockKind::Scaled, "decay");

        assert!(queue.advance(0.5, 0.5).is_empty());
        assert_eq!(queue.advance(0.5, 0.5), vec!["decay"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_is_synchronous_and_idempotent() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        let handle = queue.schedule(1.0, ClockKind::Scaled, 1);

        queue.cancel(handle);
        queue.cancel(handle); // no-op

        // A cancelled handle never fires, even far past its due time
        assert!(queue.advance(10.0, 10.0).is_empty());
        assert!(!queue.is_pending(handle));
    }

    #[test]
    fn test_cancel_isolation() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        let a = queue.schedule(1.0, ClockKind::Scaled, 1);
        let b = queue.schedule(1.0, ClockKind::Scaled, 2);

        queue.cancel(a);
        assert!(queue.is_pending(b));
        assert_eq!(queue.advance(1.0, 1.0), vec![2]);
    }

    #[test]
    fn test_same_tick_firings_keep_schedule_order() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        queue.schedule(0.8, ClockKind::Scaled, 1);
        queue.schedule(0.2, ClockKind::Scaled, 2);
        queue.schedule(0.5, ClockKind::Unscaled, 3);

        assert_eq!(queue.advance(1.0, 1.0), vec![1, 2, 3]);
    }

    #[test]
    fn test_scaled_clock_stretches_under_slowdown() {
        let mut queue: TimerQueue<&str> = TimerQueue::new();
        queue.schedule(1.0, ClockKind::Scaled, "scaled");
        queue.schedule(1.0, ClockKind::Unscaled, "unscaled");

        // Half-speed world: one real second = half a game second
        assert_eq!(queue.advance(0.5, 1.0), vec!["unscaled"]);
        assert_eq!(queue.advance(0.5, 1.0), vec!["scaled"]);
    }

    #[test]
    fn test_scaled_clock_frozen_at_zero_scale() {
        let mut queue: TimerQueue<&str> = TimerQueue::new();
        queue.schedule(0.5, ClockKind::Scaled, "scaled");

        for _ in 0..100 {
            assert!(queue.advance(0.0, 1.0).is_empty());
        }
        assert!(queue.is_pending(TimerHandle(1)));
    }
}
