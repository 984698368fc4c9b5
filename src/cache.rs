// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The word cache
//!
//! Shaping is expensive and words repeat. Each shaped word is stored as an
//! immutable [`GlyphRun`] fragment behind an [`Arc`], keyed by everything
//! which affects its shaping. Eviction (and [`WordCache::purge`]) only drops
//! the cache's reference: layouts which already merged a fragment copied
//! its glyphs, and callers holding an `Arc` keep it alive.

use crate::fonts::{CollectionId, FontSelection};
use crate::{GlyphRun, StyleFingerprint};
use log::{debug, info, trace};
use lru::LruCache;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Word cache configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordCacheConfig {
    /// Maximum number of entries
    ///
    /// Values below 1 are treated as 1.
    pub max_entries: usize,
    /// Optional budget on the estimated memory usage of all entries, in bytes
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_bytes: Option<usize>,
}

impl Default for WordCacheConfig {
    fn default() -> Self {
        WordCacheConfig {
            max_entries: 5000,
            max_bytes: None,
        }
    }
}

/// Key of a word-cache entry
///
/// Holds everything which may affect the shaped result of a word: the text,
/// the style, the font collection, the direction and the sequence of font
/// selections the resolver chose for the word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordKey {
    text: Box<str>,
    style: StyleFingerprint,
    collection: CollectionId,
    rtl: bool,
    fonts: SmallVec<[FontSelection; 1]>,
}

impl WordKey {
    /// Construct
    pub fn new(
        text: &str,
        style: StyleFingerprint,
        collection: CollectionId,
        rtl: bool,
        fonts: impl IntoIterator<Item = FontSelection>,
    ) -> Self {
        WordKey {
            text: text.into(),
            style,
            collection,
            rtl,
            fonts: fonts.into_iter().collect(),
        }
    }

    /// The word's text
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn mem_size(&self) -> usize {
        let fonts = if self.fonts.spilled() {
            self.fonts.capacity() * std::mem::size_of::<FontSelection>()
        } else {
            0
        };
        std::mem::size_of::<Self>() + self.text.len() + self.style.heap_size() + fonts
    }
}

struct Entry {
    fragment: Arc<GlyphRun>,
    bytes: usize,
}

struct Inner {
    lru: LruCache<WordKey, Entry>,
    bytes: usize,
}

impl Inner {
    fn evict(&mut self, (key, entry): (WordKey, Entry)) {
        debug!("WordCache: evict {:?}", key.text());
        self.bytes -= entry.bytes;
    }
}

/// Snapshot of cache statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of look-ups which found an entry
    pub hits: u64,
    /// Number of look-ups which did not
    pub misses: u64,
    /// Number of entries
    pub len: usize,
    /// Estimated memory usage of entries, in bytes
    pub bytes: usize,
}

/// A bounded, least-recently-used cache of shaped words
///
/// All methods take `&self`; the cache is safe to share between threads.
/// Look-ups and insertions are serialised by an internal lock; shaping on a
/// miss happens outside the lock. When two threads shape the same word
/// concurrently the first insertion wins and both receive that fragment.
pub struct WordCache {
    inner: Mutex<Inner>,
    max_bytes: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for WordCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordCache")
            .field("stats", &self.stats())
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

impl Default for WordCache {
    fn default() -> Self {
        WordCache::new(WordCacheConfig::default())
    }
}

static GLOBAL: OnceLock<WordCache> = OnceLock::new();

impl WordCache {
    /// Construct an empty cache
    pub fn new(config: WordCacheConfig) -> Self {
        let cap = NonZeroUsize::new(config.max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        WordCache {
            inner: Mutex::new(Inner {
                lru: LruCache::new(cap),
                bytes: 0,
            }),
            max_bytes: config.max_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Access the process-wide cache
    ///
    /// This is constructed with default configuration on first use unless
    /// [`crate::init`] was called first.
    pub fn global() -> &'static WordCache {
        GLOBAL.get_or_init(WordCache::default)
    }

    /// Set the configuration of the process-wide cache
    ///
    /// Returns false (and leaves the cache unchanged) if it already exists.
    pub(crate) fn init_global(config: WordCacheConfig) -> bool {
        let mut fresh = false;
        GLOBAL.get_or_init(|| {
            fresh = true;
            WordCache::new(config)
        });
        fresh
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are immutable once inserted; a panic elsewhere cannot leave
        // one half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a fragment
    ///
    /// Marks the entry as recently used.
    pub fn get(&self, key: &WordKey) -> Option<Arc<GlyphRun>> {
        let result = self.lock().lru.get(key).map(|e| e.fragment.clone());
        match result {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    /// Insert a fragment
    ///
    /// If the key is already present the existing fragment is kept and
    /// returned; otherwise `fragment` is inserted and returned. Entries are
    /// then evicted, least recently used first, until the cache is within
    /// its bounds.
    pub fn insert(&self, key: WordKey, fragment: Arc<GlyphRun>) -> Arc<GlyphRun> {
        let mut inner = self.lock();
        if let Some(existing) = inner.lru.get(&key) {
            return existing.fragment.clone();
        }

        let bytes = key.mem_size() + fragment.mem_size();
        trace!("WordCache: insert {:?} ({bytes} bytes)", key.text());
        let entry = Entry {
            fragment: fragment.clone(),
            bytes,
        };
        inner.bytes += bytes;
        if let Some(evicted) = inner.lru.push(key, entry) {
            inner.evict(evicted);
        }

        if let Some(max) = self.max_bytes {
            while inner.bytes > max {
                match inner.lru.pop_lru() {
                    Some(evicted) => inner.evict(evicted),
                    None => break,
                }
            }
        }

        fragment
    }

    /// Look up a fragment, shaping and inserting on a miss
    pub fn get_or_insert_with<F>(&self, key: WordKey, f: F) -> Arc<GlyphRun>
    where
        F: FnOnce() -> GlyphRun,
    {
        if let Some(fragment) = self.get(&key) {
            trace!("WordCache: hit {:?}", key.text());
            return fragment;
        }
        trace!("WordCache: miss {:?}", key.text());
        let fragment = Arc::new(f());
        self.insert(key, fragment)
    }

    /// Drop all entries
    ///
    /// Safe to call at any time: fragments in use elsewhere stay alive until
    /// released.
    pub fn purge(&self) {
        let mut inner = self.lock();
        let len = inner.lru.len();
        inner.lru.clear();
        inner.bytes = 0;
        info!("WordCache: purged {len} entries");
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.lock().lru.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is present (without marking it as used)
    pub fn contains(&self, key: &WordKey) -> bool {
        self.lock().lru.contains(key)
    }

    /// Get statistics
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: inner.lru.len(),
            bytes: inner.bytes,
        }
    }
}

/// Log cache configuration (used by [`crate::init`])
pub(crate) fn log_config(cache: &WordCache) {
    let cap = cache.lock().lru.cap();
    debug!(
        "WordCache: max_entries={cap}, max_bytes={:?}",
        cache.max_bytes
    );
}
