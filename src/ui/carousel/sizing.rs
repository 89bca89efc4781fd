// SPDX-License-Identifier: MPL-2.0
//! Responsive sizing engine.
//!
//! Keeps the carousel frame from changing height when slides of different
//! aspect ratios swap in. Every item's natural size is probed once; from
//! those and the container's current width a stable minimum height is
//! computed so the tallest possible slide never reflows the frame. Viewport
//! resizes recompute from the cached sizes through a debounce — probes are
//! never repeated.

use crate::media::NaturalSize;
use crate::timing::Debounce;
use std::time::{Duration, Instant};

/// Upper bound on the scaled slide height.
pub const MAX_CAP_HEIGHT: u32 = 640;

/// Fixed chrome allowance added to the tallest slide (caption + padding).
pub const FIXED_CHROME: u32 = 56;

/// Trailing delay for resize recomputation.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(120);

/// One item's probe slot. A failed probe resolves to `Resolved(None)` and
/// contributes no size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Pending,
    Resolved(Option<NaturalSize>),
}

/// Sizing engine state for one carousel.
#[derive(Debug, Clone)]
pub struct Engine {
    sizes: Vec<Probe>,
    resolved: usize,
    stable_height: Option<u32>,
    debounce: Debounce,
}

impl Engine {
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            sizes: vec![Probe::Pending; item_count],
            resolved: 0,
            stable_height: None,
            debounce: Debounce::new(RESIZE_DEBOUNCE),
        }
    }

    /// Records a probe outcome for one item. Out-of-range or repeated
    /// probes are ignored.
    pub fn record_probe(&mut self, index: usize, size: Option<NaturalSize>) {
        let Some(slot) = self.sizes.get_mut(index) else {
            return;
        };
        if *slot != Probe::Pending {
            return;
        }
        *slot = Probe::Resolved(size);
        self.resolved += 1;
    }

    /// Whether every probe has resolved (successfully or not).
    #[must_use]
    pub fn all_resolved(&self) -> bool {
        self.resolved >= self.sizes.len()
    }

    /// Recomputes the stable height for the given container width from the
    /// cached natural sizes. With zero successful probes no minimum height
    /// is applied and the frame collapses naturally.
    pub fn recompute(&mut self, container_width: f32) {
        let tallest = self
            .sizes
            .iter()
            .filter_map(|probe| match probe {
                Probe::Resolved(Some(natural)) => Some(*natural),
                _ => None,
            })
            .map(|natural| scaled_height(container_width, natural))
            .max();

        self.stable_height = tallest.map(|h| h + FIXED_CHROME);
    }

    /// The current minimum frame height, if any size is known.
    #[must_use]
    pub fn stable_height(&self) -> Option<u32> {
        self.stable_height
    }

    /// The viewport was resized; schedules a debounced recomputation.
    pub fn viewport_resized(&mut self, now: Instant) {
        self.debounce.schedule(now);
    }

    /// Polls the resize debounce. Returns `true` when the caller should
    /// recompute with the current container width.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.debounce.poll(now)
    }

    /// Whether a debounced recomputation is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }
}

/// Height of one slide scaled to the container width, capped.
fn scaled_height(container_width: f32, natural: NaturalSize) -> u32 {
    if natural.width == 0 {
        return 0;
    }
    let scaled =
        (container_width * natural.height as f32 / natural.width as f32).round() as u32;
    scaled.min(MAX_CAP_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> Option<NaturalSize> {
        Some(NaturalSize { width, height })
    }

    #[test]
    fn stable_height_tracks_the_tallest_scaled_slide() {
        let mut engine = Engine::new(3);
        engine.record_probe(0, size(800, 400)); // 2:1 -> 300 at w=600
        engine.record_probe(1, size(800, 600)); // 4:3 -> 450 at w=600
        engine.record_probe(2, size(400, 100)); // 4:1 -> 150 at w=600
        assert!(engine.all_resolved());

        engine.recompute(600.0);
        assert_eq!(engine.stable_height(), Some(450 + FIXED_CHROME));
    }

    #[test]
    fn scaled_height_is_capped() {
        let mut engine = Engine::new(1);
        engine.record_probe(0, size(100, 2000)); // portrait, would be 12000 at w=600
        engine.recompute(600.0);
        assert_eq!(engine.stable_height(), Some(MAX_CAP_HEIGHT + FIXED_CHROME));
    }

    #[test]
    fn failed_probes_contribute_no_size() {
        let mut engine = Engine::new(2);
        engine.record_probe(0, None);
        engine.record_probe(1, size(800, 400));
        engine.recompute(800.0);
        assert_eq!(engine.stable_height(), Some(400 + FIXED_CHROME));
    }

    #[test]
    fn all_probes_failed_applies_no_minimum() {
        let mut engine = Engine::new(2);
        engine.record_probe(0, None);
        engine.record_probe(1, None);
        assert!(engine.all_resolved());

        engine.recompute(800.0);
        assert_eq!(engine.stable_height(), None);
    }

    #[test]
    fn empty_engine_is_immediately_resolved() {
        let mut engine = Engine::new(0);
        assert!(engine.all_resolved());
        engine.recompute(800.0);
        assert_eq!(engine.stable_height(), None);
    }

    #[test]
    fn resize_recomputes_from_cached_sizes() {
        let mut engine = Engine::new(1);
        engine.record_probe(0, size(800, 400));
        engine.recompute(800.0);
        assert_eq!(engine.stable_height(), Some(400 + FIXED_CHROME));

        // Narrower container: same cached natural size, new scale.
        engine.recompute(400.0);
        assert_eq!(engine.stable_height(), Some(200 + FIXED_CHROME));
    }

    #[test]
    fn resize_debounce_fires_once_after_burst() {
        let start = Instant::now();
        let mut engine = Engine::new(1);

        engine.viewport_resized(start);
        engine.viewport_resized(start + Duration::from_millis(50));
        assert!(engine.is_pending());

        assert!(!engine.poll(start + Duration::from_millis(120)));
        assert!(engine.poll(start + Duration::from_millis(170)));
        assert!(!engine.is_pending());
    }

    #[test]
    fn out_of_range_probe_is_ignored() {
        let mut engine = Engine::new(1);
        engine.record_probe(5, size(100, 100));
        assert!(!engine.all_resolved());
    }

    #[test]
    fn repeated_probe_for_same_item_is_ignored() {
        let mut engine = Engine::new(2);
        engine.record_probe(0, None);
        engine.record_probe(0, size(100, 100));
        assert!(!engine.all_resolved());

        engine.recompute(600.0);
        assert_eq!(engine.stable_height(), None);
    }

    #[test]
    fn zero_width_natural_size_is_harmless() {
        let mut engine = Engine::new(1);
        engine.record_probe(0, size(0, 100));
        engine.recompute(600.0);
        assert_eq!(engine.stable_height(), Some(FIXED_CHROME));
    }
}
