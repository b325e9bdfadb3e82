//! Process-wide cache of semantic source answers.
//!
//! Entries are keyed by `(word, source_name)` and expire a fixed time after
//! they were fetched. Expiry is checked when an entry is read; there is no
//! background sweeper. Concurrent misses for the same key share a single
//! fetch, and failed fetches are never cached.

use std::{
    fmt,
    time::{Duration, SystemTime},
};

use log::{debug, trace};
use moka::sync::Cache;

use lexigraph_core::relationship::RelationshipSet;

use crate::semantic::source::SourceUnavailable;

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

type CacheKey = (String, String);

/// A cached answer from one source for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    relationships: RelationshipSet,
    fetched_at: SystemTime,
    ttl: Duration,
}

impl CacheEntry {
    pub fn relationships(&self) -> &RelationshipSet {
        &self.relationships
    }

    pub fn fetched_at(&self) -> SystemTime {
        self.fetched_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Thread-safe TTL cache with single-flight fetches.
///
/// Share it between pipeline invocations with an `Arc`.
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use lexigraph::semantic::SemanticCache;
/// # use lexigraph_core::{graph::RelationType, relationship::RelationshipSet};
/// let cache = SemanticCache::new(Duration::from_secs(60));
///
/// let set = cache
///     .get_or_fetch("game", "static_fallback", || {
///         Ok(RelationshipSet::new().with(RelationType::IsA, "activity"))
///     })
///     .unwrap();
/// assert!(set.is_a().contains("activity"));
///
/// // Served from the cache: the fetch closure is not called.
/// let cached = cache
///     .get_or_fetch("game", "static_fallback", || unreachable!())
///     .unwrap();
/// assert_eq!(set, cached);
/// ```
#[derive(Clone)]
pub struct SemanticCache {
    entries: Cache<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl SemanticCache {
    /// Longest accepted entry lifetime. Longer values are clamped to it.
    pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        let ttl = ttl.min(Self::MAX_TTL);
        Self {
            entries: Cache::builder().time_to_live(ttl).build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached answer for `(word, source_name)`, calling `fetch` on
    /// a miss or an expired entry.
    ///
    /// While a fetch for a key is in flight, other callers asking for the same
    /// key block and receive its result instead of fetching again.
    ///
    /// # Errors
    ///
    /// Returns the [`SourceUnavailable`] produced by `fetch`. The failure is
    /// not cached, so the next call fetches again.
    pub fn get_or_fetch<F>(
        &self,
        word: &str,
        source_name: &str,
        fetch: F,
    ) -> Result<RelationshipSet, SourceUnavailable>
    where
        F: FnOnce() -> Result<RelationshipSet, SourceUnavailable>,
    {
        let key = (word.to_string(), source_name.to_string());
        self.entries
            .try_get_with(key, || {
                debug!(word = word, source = source_name; "Semantic cache miss");
                fetch().map(|relationships| CacheEntry {
                    relationships,
                    fetched_at: SystemTime::now(),
                    ttl: self.ttl,
                })
            })
            .map(|entry| {
                trace!(word = word, source = source_name; "Semantic cache served entry");
                entry.relationships
            })
            .map_err(|err| (*err).clone())
    }

    /// Returns the live entry for `(word, source_name)` without fetching.
    pub fn entry(&self, word: &str, source_name: &str) -> Option<CacheEntry> {
        self.entries
            .get(&(word.to_string(), source_name.to_string()))
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }

    /// Number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for SemanticCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl fmt::Debug for SemanticCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticCache")
            .field("ttl", &self.ttl)
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Barrier,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use lexigraph_core::graph::RelationType;

    use super::*;

    fn activity() -> RelationshipSet {
        RelationshipSet::new().with(RelationType::IsA, "activity")
    }

    fn unavailable() -> SourceUnavailable {
        SourceUnavailable::Timeout {
            source_name: "flaky".to_string(),
        }
    }

    #[test]
    fn test_hit_does_not_refetch() {
        let cache = SemanticCache::default();
        let calls = AtomicUsize::new(0);
        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(activity())
        };

        assert_eq!(cache.get_or_fetch("game", "static", fetch).unwrap(), activity());
        assert_eq!(cache.get_or_fetch("game", "static", fetch).unwrap(), activity());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_key_includes_source_name() {
        let cache = SemanticCache::default();
        cache.get_or_fetch("game", "a", || Ok(activity())).unwrap();
        let other = cache
            .get_or_fetch("game", "b", || Ok(RelationshipSet::new()))
            .unwrap();

        assert!(other.is_empty());
        assert_eq!(cache.entry_count(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = SemanticCache::default();

        let err = cache.get_or_fetch("game", "flaky", || Err(unavailable()));
        assert_eq!(err, Err(unavailable()));
        assert!(cache.entry("game", "flaky").is_none());

        let ok = cache.get_or_fetch("game", "flaky", || Ok(activity()));
        assert_eq!(ok, Ok(activity()));
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = SemanticCache::new(Duration::from_millis(50));
        let calls = AtomicUsize::new(0);
        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(activity())
        };

        cache.get_or_fetch("game", "static", fetch).unwrap();
        thread::sleep(Duration::from_millis(120));
        assert!(cache.entry("game", "static").is_none());

        cache.get_or_fetch("game", "static", fetch).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_entry_records_fetch_metadata() {
        let cache = SemanticCache::new(Duration::from_secs(30));
        let before = SystemTime::now();
        cache.get_or_fetch("game", "static", || Ok(activity())).unwrap();

        let entry = cache.entry("game", "static").unwrap();
        assert_eq!(entry.relationships(), &activity());
        assert_eq!(entry.ttl(), Duration::from_secs(30));
        assert!(entry.fetched_at() >= before);
    }

    #[test]
    fn test_concurrent_misses_fetch_once() {
        const CALLERS: usize = 8;

        let cache = Arc::new(SemanticCache::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_fetch("game", "slow", || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(100));
                        Ok(activity())
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(activity()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_oversized_ttl_is_clamped() {
        let cache = SemanticCache::new(Duration::from_secs(40_000_000_000));

        assert_eq!(cache.ttl(), SemanticCache::MAX_TTL);
        assert_eq!(cache.get_or_fetch("game", "static", || Ok(activity())), Ok(activity()));
    }

    #[test]
    fn test_invalidate_all() {
        let cache = SemanticCache::default();
        cache.get_or_fetch("game", "static", || Ok(activity())).unwrap();
        cache.invalidate_all();

        assert_eq!(cache.entry_count(), 0);
        assert!(cache.entry("game", "static").is_none());
    }
}
