//! LRU fingerprint cache.

use super::key::{similarity, Fingerprint};
use crate::types::{OptimizeMode, OptimizeResponse};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    evictions: AtomicU64,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.sets.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

/// Bounded LRU cache of prior responses keyed by [`Fingerprint`].
///
/// Reads through [`get`](Self::get) refresh recency; [`find_similar`](Self::find_similar)
/// does not. The size never exceeds the capacity.
pub struct FingerprintCache {
    entries: Mutex<LruCache<Fingerprint, OptimizeResponse>>,
    capacity: usize,
    stats: AtomicStats,
}

impl FingerprintCache {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            capacity: cap.get(),
            stats: AtomicStats::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Fingerprint, OptimizeResponse>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<OptimizeResponse> {
        let hit = self.lock().get(fingerprint).cloned();
        if hit.is_some() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Insert or replace; evicts the least-recently-used entry when full.
    ///
    /// Returns the evicted fingerprint, if any.
    pub fn set(&self, fingerprint: Fingerprint, response: OptimizeResponse) -> Option<Fingerprint> {
        let evicted = {
            let mut entries = self.lock();
            let key = fingerprint.clone();
            match entries.push(fingerprint, response) {
                Some((old, _)) if old != key => Some(old),
                _ => None,
            }
        };
        self.stats.sets.fetch_add(1, Ordering::Relaxed);
        if let Some(ref old) = evicted {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(mode = old.mode.tag(), "fingerprint cache evicted least-recently-used entry");
        }
        evicted
    }

    /// First same-mode entry, least-recently-used first, whose score exceeds `threshold`.
    pub fn find_similar(&self, text: &str, mode: OptimizeMode, threshold: f64) -> Option<Fingerprint> {
        let entries = self.lock();
        entries
            .iter()
            .rev()
            .map(|(fp, _)| fp)
            .filter(|fp| fp.has_mode(mode))
            .find(|fp| similarity(text, &fp.text) > threshold)
            .cloned()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock().clear();
        self.stats.reset();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }
}
