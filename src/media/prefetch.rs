// SPDX-License-Identifier: MPL-2.0
//! Slide preload cache for faster navigation.
//!
//! Adjacent slides are decoded ahead of time so `next`/`prev` and lightbox
//! arrow keys swap without a visible load. The cache is LRU-evicted and
//! bounded both by total bytes and by entry count; both widget kinds share
//! one cache keyed by resolved image path.

use crate::media::ImageData;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Default cache size in bytes (32 MB).
pub const DEFAULT_CACHE_BYTES: usize = 32 * 1024 * 1024;

/// Default maximum number of cached slides.
pub const DEFAULT_MAX_SLIDES: usize = 16;

/// Configuration for the slide cache.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub max_bytes: usize,
    pub max_slides: usize,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_CACHE_BYTES,
            max_slides: DEFAULT_MAX_SLIDES,
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Creates a disabled configuration (every lookup misses).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    image: ImageData,
    size_bytes: usize,
}

/// LRU cache of decoded slides.
pub struct SlideCache {
    cache: LruCache<PathBuf, CacheEntry>,
    config: CacheConfig,
    current_bytes: usize,
}

impl SlideCache {
    /// Creates a new cache with the given configuration.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_slides)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_MAX_SLIDES).expect("non-zero default"));
        Self {
            cache: LruCache::new(capacity),
            config,
            current_bytes: 0,
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Inserts a decoded slide.
    ///
    /// Returns `false` when caching is disabled or the slide alone exceeds
    /// half the byte budget.
    pub fn insert(&mut self, path: PathBuf, image: ImageData) -> bool {
        if !self.config.enabled {
            return false;
        }

        let size_bytes = image.size_bytes();
        if size_bytes > self.config.max_bytes / 2 {
            return false;
        }

        while self.current_bytes + size_bytes > self.config.max_bytes && !self.cache.is_empty() {
            if let Some((_, evicted)) = self.cache.pop_lru() {
                self.current_bytes = self.current_bytes.saturating_sub(evicted.size_bytes);
            }
        }

        if let Some(existing) = self.cache.pop(&path) {
            self.current_bytes = self.current_bytes.saturating_sub(existing.size_bytes);
        }

        self.current_bytes += size_bytes;
        self.cache.put(path, CacheEntry { image, size_bytes });
        true
    }

    /// Looks up a slide, refreshing its LRU position.
    pub fn get(&mut self, path: &Path) -> Option<ImageData> {
        if !self.config.enabled {
            return None;
        }
        self.cache.get(path).map(|entry| entry.image.clone())
    }

    /// Checks presence without touching LRU order.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.config.enabled && self.cache.contains(path)
    }

    /// Filters a preload candidate list down to the paths not yet cached.
    #[must_use]
    pub fn paths_to_prefetch(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        if !self.config.enabled {
            return Vec::new();
        }
        paths
            .iter()
            .filter(|p| !self.cache.contains(p.as_path()))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.current_bytes = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.current_bytes
    }
}

impl std::fmt::Debug for SlideCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideCache")
            .field("enabled", &self.config.enabled)
            .field("slide_count", &self.cache.len())
            .field("memory_usage", &self.current_bytes)
            .finish()
    }
}

/// The wrapped neighbor indices to preload around `current`.
///
/// Duplicates and `current` itself are excluded, so a two-item list yields
/// one neighbor and a single-item list yields none.
#[must_use]
pub fn neighbor_indices(current: usize, len: usize) -> Vec<usize> {
    if len < 2 {
        return Vec::new();
    }

    let prev = (current + len - 1) % len;
    let next = (current + 1) % len;

    let mut neighbors = vec![prev];
    if next != prev {
        neighbors.push(next);
    }
    neighbors.retain(|&i| i != current);
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> ImageData {
        let pixels = vec![0u8; (width * height * 4) as usize];
        ImageData::from_rgba(width, height, pixels)
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = SlideCache::with_defaults();
        assert!(cache.is_empty());
        assert_eq!(cache.memory_usage(), 0);
    }

    #[test]
    fn insert_and_get_slide() {
        let mut cache = SlideCache::with_defaults();
        let path = PathBuf::from("/gallery/a.jpg");

        assert!(cache.insert(path.clone(), test_image(100, 100)));
        assert_eq!(cache.len(), 1);

        let hit = cache.get(&path).expect("cached slide");
        assert_eq!(hit.width, 100);
    }

    #[test]
    fn disabled_cache_misses_everything() {
        let mut cache = SlideCache::new(CacheConfig::disabled());
        let path = PathBuf::from("/gallery/a.jpg");

        assert!(!cache.insert(path.clone(), test_image(100, 100)));
        assert!(cache.get(&path).is_none());
        assert!(!cache.contains(&path));
    }

    #[test]
    fn eviction_keeps_bytes_within_budget() {
        let config = CacheConfig {
            max_bytes: 100_000,
            max_slides: 100,
            enabled: true,
        };
        let mut cache = SlideCache::new(config);

        // Each 50x50 slide is 10,000 bytes; 15 inserts must evict.
        for i in 0..15 {
            cache.insert(PathBuf::from(format!("/gallery/{i}.jpg")), test_image(50, 50));
        }

        assert!(cache.memory_usage() <= 100_000);
        assert!(cache.len() < 15);
    }

    #[test]
    fn oversized_slide_is_not_cached() {
        let config = CacheConfig {
            max_bytes: 1024,
            max_slides: 8,
            enabled: true,
        };
        let mut cache = SlideCache::new(config);

        assert!(!cache.insert(PathBuf::from("/gallery/huge.jpg"), test_image(64, 64)));
        assert!(cache.is_empty());
    }

    #[test]
    fn paths_to_prefetch_filters_cached() {
        let mut cache = SlideCache::with_defaults();
        let cached = PathBuf::from("/gallery/cached.jpg");
        cache.insert(cached.clone(), test_image(10, 10));

        let wanted = vec![
            cached.clone(),
            PathBuf::from("/gallery/x.jpg"),
            PathBuf::from("/gallery/y.jpg"),
        ];
        let to_fetch = cache.paths_to_prefetch(&wanted);
        assert_eq!(to_fetch.len(), 2);
        assert!(!to_fetch.contains(&cached));
    }

    #[test]
    fn neighbor_indices_wrap_at_both_ends() {
        assert_eq!(neighbor_indices(0, 4), vec![3, 1]);
        assert_eq!(neighbor_indices(3, 4), vec![2, 0]);
        assert_eq!(neighbor_indices(1, 4), vec![0, 2]);
    }

    #[test]
    fn neighbor_indices_degenerate_lists() {
        assert!(neighbor_indices(0, 0).is_empty());
        assert!(neighbor_indices(0, 1).is_empty());
        assert_eq!(neighbor_indices(0, 2), vec![1]);
        assert_eq!(neighbor_indices(1, 2), vec![0]);
    }
}
