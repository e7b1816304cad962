//! Cached remote queries
//!
//! Every remote call the aggregator makes goes through a cache entry with a
//! freshness timestamp and a refresh policy. A refetch never evicts the
//! previous successful value: while one is in flight, and after a failed
//! one, readers keep seeing the last resolved data. Absent data means
//! "not ready", never "empty" — derived metrics gate on every input having
//! resolved before combining anything.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::StatsResult;

/// Observable state of a cached query.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    pub is_loading: bool,
    pub is_success: bool,
}

impl<T> QueryState<T> {
    pub fn ready(&self) -> bool {
        self.data.is_some()
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_success: self.is_success,
        }
    }
}

struct Entry<T> {
    value: Option<Arc<T>>,
    fetched_at: Option<Instant>,
    in_flight: bool,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self { value: None, fetched_at: None, in_flight: false }
    }
}

impl<T> Entry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        match self.fetched_at {
            Some(at) => at.elapsed() < ttl,
            None => false,
        }
    }

    fn state(&self) -> QueryState<T> {
        QueryState {
            data: self.value.clone(),
            is_loading: self.in_flight,
            is_success: self.value.is_some(),
        }
    }
}

/// A single cache entry identified by a stable key.
pub struct CachedQuery<T> {
    key: String,
    ttl: Duration,
    entry: RwLock<Entry<T>>,
}

impl<T> CachedQuery<T> {
    pub fn new(key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            ttl,
            entry: RwLock::new(Entry::default()),
        }
    }

    /// Current state without triggering a fetch.
    pub async fn state(&self) -> QueryState<T> {
        self.entry.read().await.state()
    }

    /// Returns the cached value if still fresh, otherwise runs `fetch` and
    /// stores the result. A failed fetch retains the previous value.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StatsResult<T>>,
    {
        {
            let entry = self.entry.read().await;
            if entry.is_fresh(self.ttl) {
                return entry.state();
            }
        }

        self.entry.write().await.in_flight = true;
        let result = fetch().await;
        let mut entry = self.entry.write().await;
        entry.in_flight = false;

        match result {
            Ok(value) => {
                entry.value = Some(Arc::new(value));
                entry.fetched_at = Some(Instant::now());
                debug!("cache refresh ok: {}", self.key);
            }
            Err(e) => {
                // Previous data stays visible; stale beats flicker.
                warn!("cache refresh failed for {}: {}", self.key, e);
            }
        }

        entry.state()
    }

    /// Drops the freshness timestamp so the next read refetches. The value
    /// itself stays available until superseded.
    pub async fn invalidate(&self) {
        self.entry.write().await.fetched_at = None;
    }
}

/// A parameterized cache: one entry per key, shared TTL. Used where the same
/// endpoint is queried under many parameters (block-by-timestamp lookups),
/// so sibling metrics asking for the same key within the TTL share one fetch
/// result.
pub struct KeyedCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Arc<V>, Instant)>>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> StatsResult<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StatsResult<V>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some((value, at)) = entries.get(&key) {
                if at.elapsed() < self.ttl {
                    return Ok(value.clone());
                }
            }
        }

        let value = Arc::new(fetch().await?);
        let mut entries = self.entries.write().await;
        // Keys derived from "now" appear once and never come back, so the
        // map must shed expired entries or a long-running process grows it
        // every cycle.
        entries.retain(|_, (_, at)| at.elapsed() < self.ttl);
        entries.insert(key, (value.clone(), Instant::now()));
        Ok(value)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
