// SPDX-License-Identifier: MPL-2.0
//! Deadline and debounce handles driven by the periodic application tick.
//!
//! All timed behavior in the widgets (autoplay advance, cross-fade swap,
//! resize debounce, overlay transitions) is expressed through these handles
//! rather than ad hoc timer bookkeeping. A handle is armed with an explicit
//! `Instant` and polled with one, so the state machines that own them stay
//! fully deterministic under test.

use std::time::{Duration, Instant};

/// A cancellable one-shot deadline.
///
/// Scheduling while armed replaces the pending deadline (cancel-on-reschedule).
/// `poll` fires at most once per schedule and disarms the handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    fire_at: Option<Instant>,
}

impl Deadline {
    /// Creates a disarmed deadline.
    #[must_use]
    pub fn idle() -> Self {
        Self { fire_at: None }
    }

    /// Arms the deadline `delay` from `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.fire_at = Some(now + delay);
    }

    /// Disarms the deadline without firing.
    pub fn cancel(&mut self) {
        self.fire_at = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.fire_at.is_some()
    }

    /// Returns `true` exactly once when `now` has reached the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.fire_at {
            Some(at) if now >= at => {
                self.fire_at = None;
                true
            }
            _ => false,
        }
    }
}

/// A trailing-edge debounce: every `schedule` pushes the single pending
/// deadline out by the configured delay, so only the last burst event fires.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    deadline: Deadline,
    delay: Duration,
}

impl Debounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            deadline: Deadline::idle(),
            delay,
        }
    }

    /// Schedules (or reschedules) the trailing callback.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline.schedule(now, self.delay);
    }

    /// Cancels any pending callback.
    pub fn cancel(&mut self) {
        self.deadline.cancel();
    }

    /// Whether a callback is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_armed()
    }

    /// Returns `true` exactly once when the trailing delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.deadline.poll(now)
    }
}
