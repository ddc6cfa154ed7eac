//! Unit tests for the click history cache over the in-memory and SQLite stores.

use std::sync::Arc;

use restaurant_recommender::managers::click_history_manager::{
    ClickHistoryCache, ClickHistoryCacheTrait,
};
use restaurant_recommender::storage::{KeyValueStore, MemoryStore, SqliteStore};
use restaurant_recommender::types::errors::StorageError;
use restaurant_recommender::types::restaurant::RestaurantId;
use tempfile::TempDir;

fn ids(raw: &[i64]) -> Vec<RestaurantId> {
    raw.iter().copied().map(RestaurantId).collect()
}

fn cache_with(raw: &str) -> ClickHistoryCache<MemoryStore> {
    ClickHistoryCache::new(MemoryStore::with_entry("restaurant_clicks", raw))
}

// ─── Loading ───

#[test]
fn test_load_absent_is_empty() {
    let cache = ClickHistoryCache::new(MemoryStore::new());
    assert!(cache.load().is_empty());
    assert_eq!(cache.most_recent(), None);
}

#[test]
fn test_load_corrupt_blob_is_empty() {
    for raw in ["not json", "{\"a\":1}", "[\"x\"]", ""] {
        let cache = cache_with(raw);
        assert!(cache.load().is_empty(), "blob {:?} should load as empty", raw);
    }
}

#[test]
fn test_load_preserves_order() {
    let cache = cache_with("[3,1,2]");
    assert_eq!(cache.load().as_slice(), ids(&[3, 1, 2]).as_slice());
    assert_eq!(cache.most_recent(), Some(RestaurantId(2)));
}

#[test]
fn test_load_normalizes_duplicates_and_excess() {
    let cache = cache_with("[1,2,1,3,4,5,6,7]");
    assert_eq!(cache.load().as_slice(), ids(&[3, 4, 5, 6, 7]).as_slice());
}

// ─── Recording ───

#[test]
fn test_record_into_empty() {
    let mut cache = ClickHistoryCache::new(MemoryStore::new());
    let history = cache.record_click(RestaurantId(10)).unwrap();
    assert_eq!(history.as_slice(), ids(&[10]).as_slice());
}

#[test]
fn test_record_evicts_oldest_when_full() {
    let mut cache = cache_with("[1,2,3,4,5]");
    let history = cache.record_click(RestaurantId(6)).unwrap();
    assert_eq!(history.as_slice(), ids(&[2, 3, 4, 5, 6]).as_slice());
    assert_eq!(cache.load(), history);
}

#[test]
fn test_record_existing_moves_to_end() {
    let mut cache = cache_with("[1,2,3]");
    let history = cache.record_click(RestaurantId(2)).unwrap();
    assert_eq!(history.as_slice(), ids(&[1, 3, 2]).as_slice());
}

#[test]
fn test_record_most_recent_again_is_noop() {
    let mut cache = cache_with("[1,2,3]");
    let history = cache.record_click(RestaurantId(3)).unwrap();
    assert_eq!(history.as_slice(), ids(&[1, 2, 3]).as_slice());
}

#[test]
fn test_alternating_clicks() {
    let mut cache = ClickHistoryCache::new(MemoryStore::new());
    for id in [7, 8, 7] {
        cache.record_click(RestaurantId(id)).unwrap();
    }
    assert_eq!(cache.load().as_slice(), ids(&[8, 7]).as_slice());
    assert_eq!(cache.most_recent(), Some(RestaurantId(7)));
}

#[test]
fn test_record_replaces_corrupt_blob() {
    let mut cache = cache_with("garbage");
    let history = cache.record_click(RestaurantId(4)).unwrap();
    assert_eq!(history.as_slice(), ids(&[4]).as_slice());
    assert_eq!(
        cache.store().load("restaurant_clicks").unwrap().as_deref(),
        Some("[4]")
    );
}

#[test]
fn test_clear() {
    let mut cache = cache_with("[1,2]");
    cache.clear().unwrap();
    assert!(cache.load().is_empty());
    assert_eq!(cache.most_recent(), None);
}

// ─── Storage failures ───

/// A store whose writes always fail.
struct ReadOnlyStore {
    inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

/// A store whose reads always fail.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[test]
fn test_failed_write_surfaces_error_and_keeps_previous() {
    let mut cache = ClickHistoryCache::new(ReadOnlyStore {
        inner: MemoryStore::with_entry("restaurant_clicks", "[1]"),
    });

    let err = cache.record_click(RestaurantId(2)).unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
    assert_eq!(cache.load().as_slice(), ids(&[1]).as_slice());
}

#[test]
fn test_failed_read_is_empty_history() {
    let mut cache = ClickHistoryCache::new(BrokenStore);
    assert!(cache.load().is_empty());
    assert_eq!(cache.record_click(RestaurantId(9)).unwrap().as_slice(), ids(&[9]).as_slice());
}

// ─── Persistence ───

#[test]
fn test_sqlite_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clicks.db");

    {
        let mut cache = ClickHistoryCache::new(SqliteStore::open(&path).unwrap());
        for id in [1, 2, 3] {
            cache.record_click(RestaurantId(id)).unwrap();
        }
    }

    let cache = ClickHistoryCache::new(SqliteStore::open(&path).unwrap());
    assert_eq!(cache.load().as_slice(), ids(&[1, 2, 3]).as_slice());
    assert_eq!(cache.most_recent(), Some(RestaurantId(3)));
}

#[test]
fn test_two_caches_share_one_store() {
    let store = Arc::new(MemoryStore::new());
    let mut writer = ClickHistoryCache::new(store.clone());
    let reader = ClickHistoryCache::new(store);

    writer.record_click(RestaurantId(5)).unwrap();
    assert_eq!(reader.most_recent(), Some(RestaurantId(5)));
}
