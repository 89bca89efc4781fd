// SPDX-License-Identifier: MPL-2.0
//! Cross-fade sub-component with a stale-load generation guard.
//!
//! Every navigation starts a fade-out, swaps the underlying source after a
//! short delay (so the fade is visibly underway first), then fades back in
//! once the new slide has decoded. Each navigation increments a generation
//! counter; a load completion carrying an older generation is a no-op, so a
//! slow decode can never overwrite the slide the user has since moved to.

use crate::timing::Deadline;
use std::time::{Duration, Instant};

/// Delay between starting the fade-out and swapping the source.
pub const SWAP_DELAY: Duration = Duration::from_millis(60);

/// Duration of the opacity ramp in each direction.
pub const FADE_DURATION: Duration = Duration::from_millis(220);

/// Fade phases for the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Steady state, fully visible.
    Idle,
    /// Fading out toward the swap.
    FadingOut { started: Instant, target: usize },
    /// Source swapped, waiting for the decode to finish.
    Loading { target: usize },
    /// New slide visible, ramping opacity back up.
    FadingIn { started: Instant },
}

/// Cross-fade state.
#[derive(Debug, Clone)]
pub struct State {
    phase: Phase,
    generation: u64,
    swap_deadline: Deadline,
}

/// Effects produced while polling the fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The swap delay elapsed: load the target slide now.
    SwapSource { target: usize, generation: u64 },
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            swap_deadline: Deadline::idle(),
        }
    }

    /// Starts a fade toward `target`, invalidating any in-flight load.
    /// Returns the generation the eventual load completion must carry.
    pub fn begin(&mut self, now: Instant, target: usize) -> u64 {
        self.generation += 1;
        self.phase = Phase::FadingOut {
            started: now,
            target,
        };
        self.swap_deadline.schedule(now, SWAP_DELAY);
        self.generation
    }

    /// Polls the swap deadline.
    pub fn poll(&mut self, now: Instant) -> Effect {
        if self.swap_deadline.poll(now) {
            if let Phase::FadingOut { target, .. } = self.phase {
                self.phase = Phase::Loading { target };
                return Effect::SwapSource {
                    target,
                    generation: self.generation,
                };
            }
        }
        if let Phase::FadingIn { started } = self.phase {
            if now.duration_since(started) >= FADE_DURATION {
                self.phase = Phase::Idle;
            }
        }
        Effect::None
    }

    /// Reports a finished load. Returns `false` (and changes nothing) when
    /// the generation is stale, i.e. the user has navigated on since the
    /// load was dispatched.
    pub fn load_finished(&mut self, now: Instant, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.phase = Phase::FadingIn { started: now };
        true
    }

    /// Current slide opacity for rendering.
    #[must_use]
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase {
            Phase::Idle => 1.0,
            Phase::FadingOut { started, .. } => {
                let elapsed = now.duration_since(started).as_secs_f32();
                (1.0 - elapsed / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
            }
            Phase::Loading { .. } => 0.0,
            Phase::FadingIn { started } => {
                let elapsed = now.duration_since(started).as_secs_f32();
                (elapsed / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    /// Whether a fade or pending swap still needs ticks.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle || self.swap_deadline.is_armed()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_schedules_swap_after_delay() {
        let start = Instant::now();
        let mut fade = State::new();
        let generation = fade.begin(start, 2);

        assert_eq!(fade.poll(start + Duration::from_millis(30)), Effect::None);
        assert_eq!(
            fade.poll(start + SWAP_DELAY),
            Effect::SwapSource {
                target: 2,
                generation
            }
        );
    }

    #[test]
    fn opacity_ramps_down_then_up() {
        let start = Instant::now();
        let mut fade = State::new();
        assert_eq!(fade.opacity(start), 1.0);

        let generation = fade.begin(start, 1);
        assert!(fade.opacity(start + Duration::from_millis(100)) < 1.0);

        fade.poll(start + SWAP_DELAY);
        assert_eq!(fade.opacity(start + Duration::from_millis(100)), 0.0);

        let loaded = start + Duration::from_millis(150);
        assert!(fade.load_finished(loaded, generation));
        assert!(fade.opacity(loaded + Duration::from_millis(110)) < 1.0);
        assert_eq!(fade.opacity(loaded + FADE_DURATION), 1.0);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let start = Instant::now();
        let mut fade = State::new();

        let first = fade.begin(start, 1);
        fade.poll(start + SWAP_DELAY);

        // User navigates on before the first load resolves.
        let second = fade.begin(start + Duration::from_millis(80), 2);
        assert_ne!(first, second);

        assert!(!fade.load_finished(start + Duration::from_millis(100), first));
        // The newer navigation's load still applies.
        fade.poll(start + Duration::from_millis(80) + SWAP_DELAY);
        assert!(fade.load_finished(start + Duration::from_millis(200), second));
    }

    #[test]
    fn rapid_navigation_swaps_only_latest_target() {
        let start = Instant::now();
        let mut fade = State::new();

        fade.begin(start, 1);
        // Second navigation lands before the first swap delay elapses.
        let generation = fade.begin(start + Duration::from_millis(20), 2);

        let effect = fade.poll(start + Duration::from_millis(90));
        assert_eq!(
            effect,
            Effect::SwapSource {
                target: 2,
                generation
            }
        );
        // The superseded swap never fires.
        assert_eq!(fade.poll(start + Duration::from_secs(1)), Effect::None);
    }

    #[test]
    fn settles_to_idle_after_fade_in() {
        let start = Instant::now();
        let mut fade = State::new();
        let generation = fade.begin(start, 1);
        fade.poll(start + SWAP_DELAY);
        fade.load_finished(start + Duration::from_millis(100), generation);
        assert!(fade.is_animating());

        fade.poll(start + Duration::from_millis(100) + FADE_DURATION);
        assert!(!fade.is_animating());
    }
}
