//! Per-user cache of list views.
//!
//! `GET /todos` is served from here when possible. Every successful
//! mutation invalidates the user's entry.

use std::sync::Arc;

use dashmap::DashMap;
use listsync_engine::TodoRecord;

#[derive(Debug, Default)]
struct Entry {
    /// Bumped on every invalidation
    generation: u64,
    list: Option<Arc<Vec<TodoRecord>>>,
}

/// Cached list views keyed by user id.
///
/// Thread-safe and shared across handlers via `Arc`.
#[derive(Debug, Default)]
pub struct ListCache {
    entries: DashMap<String, Entry>,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new cache wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn get(&self, user_id: &str) -> Option<Arc<Vec<TodoRecord>>> {
        self.entries.get(user_id).and_then(|entry| entry.list.clone())
    }

    /// Current generation of a user's entry; read it before fetching.
    pub fn generation(&self, user_id: &str) -> u64 {
        self.entries
            .get(user_id)
            .map(|entry| entry.generation)
            .unwrap_or_default()
    }

    /// Store a fetched list, unless the entry was invalidated since
    /// `generation` was read.
    pub fn store(&self, user_id: &str, generation: u64, list: Vec<TodoRecord>) -> bool {
        let mut entry = self.entries.entry(user_id.to_string()).or_default();
        if entry.generation != generation {
            return false;
        }
        entry.list = Some(Arc::new(list));
        true
    }

    /// Drop a user's cached list and bump the generation.
    ///
    /// The entry itself stays so a fetch already in progress sees the new
    /// generation. That leaves one small entry per user that ever mutated,
    /// held for the life of the process.
    pub fn invalidate(&self, user_id: &str) {
        let mut entry = self.entries.entry(user_id.to_string()).or_default();
        entry.generation += 1;
        entry.list = None;

        tracing::debug!(user_id, generation = entry.generation, "list cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> TodoRecord {
        TodoRecord {
            id: id.to_string(),
            text: "Buy milk".into(),
            is_complete: false,
            created_at: 1,
        }
    }

    #[test]
    fn store_and_get() {
        let cache = ListCache::new();
        assert!(cache.get("alice").is_none());

        let generation = cache.generation("alice");
        assert!(cache.store("alice", generation, vec![record("1")]));

        assert_eq!(cache.get("alice").unwrap()[0].id, "1");
        assert!(cache.get("bob").is_none());
    }

    #[test]
    fn invalidate_drops_entry() {
        let cache = ListCache::new();
        cache.store("alice", 0, vec![record("1")]);

        cache.invalidate("alice");
        assert!(cache.get("alice").is_none());
    }

    #[test]
    fn generation_survives_invalidation() {
        let cache = ListCache::new();
        cache.invalidate("alice");
        cache.invalidate("alice");

        assert_eq!(cache.generation("alice"), 2);
        assert!(!cache.store("alice", 1, vec![record("1")]));
        assert!(cache.store("alice", 2, vec![record("1")]));
    }

    #[test]
    fn stale_fetch_is_not_stored() {
        let cache = ListCache::new();
        let generation = cache.generation("alice");

        // A mutation lands while the list is being fetched
        cache.invalidate("alice");

        assert!(!cache.store("alice", generation, vec![record("1")]));
        assert!(cache.get("alice").is_none());
    }
}
