//! Bounded traversal result cache.
//!
//! Keyed by the normalized query shape: sorted start nodes, sorted
//! relations, direction, depth, and limit. The cache is bounded in both
//! entry count and age — results evict LRU-style under capacity pressure
//! and expire after the configured TTL, so the cache never grows without
//! bound.
//!
//! Queries carrying property filters bypass the cache entirely: filters are
//! not part of the key, and serving a filtered query from an unfiltered
//! result (or vice versa) would return wrong rows.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use sema_types::{TraversalQuery, TraversalResult};

/// Default maximum number of cached results.
const DEFAULT_CAPACITY: u64 = 1024;

/// Bounded TTL cache for traversal results.
#[derive(Clone)]
pub struct TraversalCache {
    inner: Cache<String, Arc<TraversalResult>>,
}

impl TraversalCache {
    /// A cache holding up to [`DEFAULT_CAPACITY`] results for `ttl` each.
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, ttl)
    }

    /// A cache with an explicit entry capacity.
    pub fn with_capacity(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Normalized cache key for a query.
    ///
    /// Start nodes and relations are sorted and deduplicated so queries
    /// differing only in list order share an entry.
    pub fn key(query: &TraversalQuery) -> String {
        let mut nodes = query.start_nodes.clone();
        nodes.sort();
        nodes.dedup();
        let mut relations = query.relations.clone();
        relations.sort();
        relations.dedup();

        format!(
            "n:{}|r:{}|d:{}|h:{}|l:{}",
            nodes.join(","),
            relations.join(","),
            query.direction,
            query.max_depth,
            query.limit.map_or_else(|| "none".into(), |l| l.to_string()),
        )
    }

    /// Returns `true` when a query is cacheable (carries no filters).
    pub fn cacheable(query: &TraversalQuery) -> bool {
        query.filters.is_empty()
    }

    /// Look up a cached result.
    pub async fn get(&self, key: &str) -> Option<Arc<TraversalResult>> {
        self.inner.get(key).await
    }

    /// Store a result.
    pub async fn insert(&self, key: String, result: Arc<TraversalResult>) {
        self.inner.insert(key, result).await;
    }

    /// Number of live entries (approximate, for diagnostics).
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
