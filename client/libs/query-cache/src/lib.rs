//! Keyed store of remote-query results for the client data layer.
//!
//! Entries are addressed by [`QueryDescriptor`] (operation name + input) and go
//! through a small lifecycle:
//!
//! ```text
//! begin_fetch -> complete_fetch      first successful read populates the slot
//! set                                direct snapshot write (optimistic step)
//! invalidate                         mark stale + broadcast, readers refetch
//! cancel                             outstanding fetch tickets become void
//! ```
//!
//! The store is process-wide shared mutable state; every action hook may read
//! or invalidate any descriptor. Cancellation is cooperative and best-effort:
//! a fetch that completes before `cancel` keeps its write, and the value is
//! superseded by the next post-settlement invalidation.
//!
//! # Example
//!
//! ```
//! use query_cache::{QueryCache, QueryDescriptor};
//! use serde_json::json;
//!
//! let cache = QueryCache::new();
//! let tweets = QueryDescriptor::new("tweet.getTweets");
//!
//! let ticket = cache.begin_fetch(&tweets);
//! assert!(cache.complete_fetch(ticket, json!([{ "id": "1" }])));
//!
//! cache.invalidate(&tweets);
//! assert!(cache.is_stale(&tweets));
//! ```

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

mod descriptor;
mod stats;

pub use descriptor::QueryDescriptor;
pub use stats::{CacheStats, StatsCollector};

/// Capacity of the invalidation broadcast channel. Laggy subscribers drop the
/// oldest events and refetch on the next one they see.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events broadcast to readers that want to refetch in the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The entry for this descriptor was marked stale.
    Invalidated(QueryDescriptor),
}

/// One cached result plus its staleness marker.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stale: bool,
}

/// Ticket returned by [`QueryCache::begin_fetch`]; voided by a later `cancel`
/// or by a newer fetch for the same descriptor.
#[derive(Debug)]
pub struct FetchTicket {
    descriptor: QueryDescriptor,
    generation: u64,
}

impl FetchTicket {
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }
}

/// In-memory cache of remote-read results.
///
/// Thread-safe via `DashMap`; cheap to share behind an `Arc`.
pub struct QueryCache {
    entries: DashMap<QueryDescriptor, CacheEntry>,
    /// Current fetch generation per descriptor. A ticket whose generation no
    /// longer matches has been cancelled or superseded.
    generations: DashMap<QueryDescriptor, u64>,
    events: broadcast::Sender<CacheEvent>,
    stats: StatsCollector,
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            events,
            stats: StatsCollector::new(),
        }
    }

    /// Last known value for a descriptor, fresh or stale.
    pub fn get(&self, descriptor: &QueryDescriptor) -> Option<Value> {
        match self.entries.get(descriptor) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Direct snapshot write. Clears staleness and leaves fetch generations
    /// untouched, so an optimistic write does not void in-flight tickets by
    /// itself.
    pub fn set(&self, descriptor: &QueryDescriptor, value: Value) {
        self.entries.insert(
            descriptor.clone(),
            CacheEntry {
                value,
                stale: false,
            },
        );
        self.stats.record_write();
        debug!(descriptor = %descriptor, "cache STORE");
    }

    /// Mark the entry stale and broadcast, scheduling a background refetch in
    /// whoever subscribes. A miss still broadcasts: readers that never cached
    /// the descriptor may want the event anyway.
    pub fn invalidate(&self, descriptor: &QueryDescriptor) {
        if let Some(mut entry) = self.entries.get_mut(descriptor) {
            entry.stale = true;
        }
        self.stats.record_invalidation();
        let _ = self.events.send(CacheEvent::Invalidated(descriptor.clone()));
        debug!(descriptor = %descriptor, "cache INVALIDATE");
    }

    /// Whether the entry exists and is marked stale.
    pub fn is_stale(&self, descriptor: &QueryDescriptor) -> bool {
        self.entries
            .get(descriptor)
            .map(|entry| entry.stale)
            .unwrap_or(false)
    }

    /// Void any outstanding fetch tickets for this descriptor.
    ///
    /// Best-effort: a fetch that already completed keeps its write.
    pub fn cancel(&self, descriptor: &QueryDescriptor) {
        let mut generation = self.generations.entry(descriptor.clone()).or_insert(0);
        *generation += 1;
        debug!(descriptor = %descriptor, generation = *generation, "cache CANCEL");
    }

    /// Register an in-flight fetch and get the ticket its result must present.
    pub fn begin_fetch(&self, descriptor: &QueryDescriptor) -> FetchTicket {
        let mut generation = self.generations.entry(descriptor.clone()).or_insert(0);
        *generation += 1;
        FetchTicket {
            descriptor: descriptor.clone(),
            generation: *generation,
        }
    }

    /// Store a fetch result if its ticket is still current. Returns whether
    /// the write was applied.
    pub fn complete_fetch(&self, ticket: FetchTicket, value: Value) -> bool {
        let current = self
            .generations
            .get(&ticket.descriptor)
            .map(|generation| *generation)
            .unwrap_or(0);
        if ticket.generation != current {
            self.stats.record_cancelled_fetch();
            debug!(descriptor = %ticket.descriptor, "cache DROP cancelled fetch result");
            return false;
        }
        self.set(&ticket.descriptor, value);
        true
    }

    /// Subscribe to invalidation events.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Fetch generations survive so outstanding tickets stay
    /// void or current exactly as before.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tweets() -> QueryDescriptor {
        QueryDescriptor::new("tweet.getTweets")
    }

    #[test]
    fn test_get_miss_then_hit() {
        let cache = QueryCache::new();
        assert!(cache.get(&tweets()).is_none());

        cache.set(&tweets(), json!([1, 2, 3]));
        assert_eq!(cache.get(&tweets()), Some(json!([1, 2, 3])));

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.writes, 1);
    }

    #[test]
    fn test_set_clears_staleness() {
        let cache = QueryCache::new();
        cache.set(&tweets(), json!("old"));
        cache.invalidate(&tweets());
        assert!(cache.is_stale(&tweets()));

        cache.set(&tweets(), json!("new"));
        assert!(!cache.is_stale(&tweets()));
    }

    #[test]
    fn test_invalidate_broadcasts() {
        let cache = QueryCache::new();
        let mut events = cache.subscribe();

        cache.set(&tweets(), json!(null));
        cache.invalidate(&tweets());

        assert_eq!(
            events.try_recv().unwrap(),
            CacheEvent::Invalidated(tweets())
        );
    }

    #[test]
    fn test_fetch_completes_when_not_cancelled() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&tweets());
        assert!(cache.complete_fetch(ticket, json!("fresh")));
        assert_eq!(cache.get(&tweets()), Some(json!("fresh")));
    }

    #[test]
    fn test_cancel_voids_outstanding_ticket() {
        let cache = QueryCache::new();
        cache.set(&tweets(), json!("snapshot"));

        let ticket = cache.begin_fetch(&tweets());
        cache.cancel(&tweets());

        assert!(!cache.complete_fetch(ticket, json!("late response")));
        assert_eq!(cache.get(&tweets()), Some(json!("snapshot")));
        assert_eq!(cache.stats().cancelled_fetches, 1);
    }

    #[test]
    fn test_newer_fetch_supersedes_older() {
        let cache = QueryCache::new();
        let old = cache.begin_fetch(&tweets());
        let new = cache.begin_fetch(&tweets());

        assert!(cache.complete_fetch(new, json!("second")));
        assert!(!cache.complete_fetch(old, json!("first")));
        assert_eq!(cache.get(&tweets()), Some(json!("second")));
    }

    #[test]
    fn test_cancel_after_completion_keeps_write() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&tweets());
        assert!(cache.complete_fetch(ticket, json!("done")));

        cache.cancel(&tweets());
        assert_eq!(cache.get(&tweets()), Some(json!("done")));
    }

    #[test]
    fn test_snapshot_restore_is_byte_identical() {
        let cache = QueryCache::new();
        let d = QueryDescriptor::with_input("tweet.getSingleTweet", json!({ "tweetId": "9" }));
        cache.set(&d, json!({ "id": "9", "text": "hello", "likes": [1, 2] }));

        let before = serde_json::to_vec(&cache.get(&d).unwrap()).unwrap();
        let snapshot = cache.get(&d).unwrap();
        cache.set(&d, snapshot);
        let after = serde_json::to_vec(&cache.get(&d).unwrap()).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_clear() {
        let cache = QueryCache::new();
        cache.set(&tweets(), json!(1));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
