//! Generation-based cache in front of a [`TextMeasure`].
//!
//! Entries are keyed by an FNV-1a hash of the text, font, size and spacing.
//! The host advances the generation once per frame with
//! [`TextMeasureCache::end_frame`]; entries not used for `max_age` frames are
//! swept, and when the cache still holds more than `max_entries` the oldest
//! quarter is pruned.

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::text::TextMeasure;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Cache key for one measurement request.
pub fn measure_key(text: &str, font: &str, font_size: f32, spacing: f32) -> u64 {
    let mut hash = fnv1a(FNV_OFFSET, text.as_bytes());
    // separator keeps ("ab", "c") and ("a", "bc") apart
    hash = fnv1a(hash, &[0xff]);
    hash = fnv1a(hash, font.as_bytes());
    hash = fnv1a(hash, &font_size.to_bits().to_le_bytes());
    fnv1a(hash, &spacing.to_bits().to_le_bytes())
}

/// Limits for [`TextMeasureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextCacheConfig {
    /// Frames an entry may go unused before it is swept
    pub max_age: u64,
    /// Entry count above which the oldest quarter is pruned
    pub max_entries: usize,
}

impl Default for TextCacheConfig {
    fn default() -> Self {
        Self {
            max_age: 60,
            max_entries: 1024,
        }
    }
}

/// Hit and miss counters since the cache was created or cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    size: Vec2,
    last_used: u64,
}

/// Memoizes an inner [`TextMeasure`].
#[derive(Debug)]
pub struct TextMeasureCache<M> {
    inner: M,
    entries: FxHashMap<u64, CacheEntry>,
    generation: u64,
    config: TextCacheConfig,
    stats: CacheStats,
}

impl<M: TextMeasure> TextMeasureCache<M> {
    pub fn new(inner: M) -> Self {
        Self::with_config(inner, TextCacheConfig::default())
    }

    pub fn with_config(inner: M, config: TextCacheConfig) -> Self {
        Self {
            inner,
            entries: FxHashMap::default(),
            generation: 0,
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    /// Advance the generation and evict stale entries.
    pub fn end_frame(&mut self) {
        self.generation += 1;

        let generation = self.generation;
        let max_age = self.config.max_age;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| generation - entry.last_used <= max_age);
        let swept = before - self.entries.len();
        if swept > 0 {
            log::trace!("text cache swept {swept} entries older than {max_age} frames");
        }

        if self.entries.len() > self.config.max_entries {
            self.prune_oldest_quarter();
        }
    }

    /// Drop up to a quarter of the entries, taking only those last used
    /// before the average generation.
    fn prune_oldest_quarter(&mut self) {
        let count = self.entries.len();
        let target = count / 4;
        if target == 0 {
            return;
        }

        let total: u128 = self.entries.values().map(|e| e.last_used as u128).sum();
        let average = (total / count as u128) as u64;

        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if removed < target && entry.last_used < average {
                removed += 1;
                false
            } else {
                true
            }
        });
        log::debug!("text cache pruned {removed} of {count} entries");
    }
}

impl<M: TextMeasure> TextMeasure for TextMeasureCache<M> {
    fn measure(&mut self, text: &str, font: &str, font_size: f32, spacing: f32) -> Vec2 {
        let key = measure_key(text, font, font_size, spacing);
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.generation;
            self.stats.hits += 1;
            return entry.size;
        }

        self.stats.misses += 1;
        let size = self.inner.measure(text, font, font_size, spacing);
        self.entries.insert(
            key,
            CacheEntry {
                size,
                last_used: self.generation,
            },
        );
        size
    }
}
