// SPDX-License-Identifier: MPL-2.0
//! Autoplay timer sub-component.
//!
//! Owns the repeating advance deadline. Any manual navigation restarts the
//! timer (stop then start) so user action always gets a full fresh interval
//! before the next automatic advance; pointer hover or keyboard focus inside
//! the widget pauses it, leaving resumes it.

use crate::page::{AutoplayDirection, CarouselOptions};
use crate::timing::Deadline;
use std::time::{Duration, Instant};

/// Autoplay timer state.
#[derive(Debug, Clone)]
pub struct State {
    enabled: bool,
    interval: Duration,
    direction: AutoplayDirection,
    deadline: Deadline,
    paused: bool,
}

/// The automatic advance to perform when the timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    Previous,
}

impl State {
    /// Builds the timer from validated options. The interval floor has
    /// already been applied at page parse time.
    #[must_use]
    pub fn new(options: &CarouselOptions) -> Self {
        Self {
            enabled: options.autoplay,
            interval: options.interval,
            direction: options.direction,
            deadline: Deadline::idle(),
            paused: false,
        }
    }

    /// Arms the first advance. No-op when autoplay is disabled.
    pub fn start(&mut self, now: Instant) {
        if self.enabled && !self.paused {
            self.deadline.schedule(now, self.interval);
        }
    }

    /// Disarms the pending advance.
    pub fn stop(&mut self) {
        self.deadline.cancel();
    }

    /// Stop-then-start: called on every manual navigation so the next
    /// automatic advance is a full interval away.
    pub fn restart(&mut self, now: Instant) {
        self.stop();
        self.start(now);
    }

    /// Pointer or focus entered the widget.
    pub fn pause(&mut self) {
        self.paused = true;
        self.deadline.cancel();
    }

    /// Pointer or focus left the widget; resumes only when enabled.
    pub fn resume(&mut self, now: Instant) {
        self.paused = false;
        self.start(now);
    }

    /// Whether a timer is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.deadline.is_armed()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls the deadline; on firing, re-arms for the following interval and
    /// returns the advance to perform.
    pub fn poll(&mut self, now: Instant) -> Option<Advance> {
        if !self.deadline.poll(now) {
            return None;
        }
        self.deadline.schedule(now, self.interval);
        Some(match self.direction {
            AutoplayDirection::Forward => Advance::Next,
            AutoplayDirection::Backward => Advance::Previous,
        })
    }
}
