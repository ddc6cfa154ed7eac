//! Recent-clicks cache.
//!
//! Tracks the last few distinct restaurants a user opened, persisted through a
//! [`KeyValueStore`] as a JSON array of ids. The newest click seeds the
//! "similar restaurants" recommendation.
//!
//! Reads never fail: an absent, unreadable or malformed blob is an empty
//! history. Concurrent writers to the same store are not coordinated; the
//! last write wins.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::services::api_client::ClickTracker;
use crate::storage::KeyValueStore;
use crate::types::errors::StorageError;
use crate::types::history::ClickHistory;
use crate::types::restaurant::RestaurantId;
use crate::types::settings::{HistorySettings, DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_KEY};

/// Trait defining click history operations.
pub trait ClickHistoryCacheTrait {
    fn load(&self) -> ClickHistory;
    fn record_click(&mut self, id: RestaurantId) -> Result<ClickHistory, StorageError>;
    fn most_recent(&self) -> Option<RestaurantId>;
    fn clear(&mut self) -> Result<(), StorageError>;
    fn capacity(&self) -> usize;
}

/// Click history cache over an injected key/value store.
pub struct ClickHistoryCache<S: KeyValueStore> {
    store: S,
    key: String,
    capacity: usize,
    tracker: Option<Arc<dyn ClickTracker>>,
}

impl<S: KeyValueStore> ClickHistoryCache<S> {
    /// Creates a cache using the default key (`restaurant_clicks`) and capacity (5).
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_HISTORY_KEY.to_string(),
            capacity: DEFAULT_HISTORY_CAPACITY,
            tracker: None,
        }
    }

    /// Creates a cache from the `history` settings section. A capacity of 0 is raised to 1.
    pub fn with_settings(store: S, settings: &HistorySettings) -> Self {
        Self {
            store,
            key: settings.storage_key.clone(),
            capacity: settings.capacity.max(1),
            tracker: None,
        }
    }

    /// Attaches the collaborator notified on every recorded click.
    pub fn with_tracker(mut self, tracker: Arc<dyn ClickTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self, history: &ClickHistory) -> Result<(), StorageError> {
        let json = serde_json::to_string(history)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.store.save(&self.key, &json)
    }
}

impl<S: KeyValueStore> ClickHistoryCacheTrait for ClickHistoryCache<S> {
    /// Reads the persisted history, oldest first.
    ///
    /// Duplicates or excess entries in a well-formed blob are normalized away.
    fn load(&self) -> ClickHistory {
        let raw = match self.store.load(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ClickHistory::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "click history unreadable, treating as empty");
                return ClickHistory::new();
            }
        };

        match serde_json::from_str::<Vec<RestaurantId>>(&raw) {
            Ok(ids) => ClickHistory::from_ids(ids, self.capacity),
            Err(e) => {
                warn!(key = %self.key, error = %e, "malformed click history, treating as empty");
                ClickHistory::new()
            }
        }
    }

    /// Moves `id` to the most-recent slot, trims to capacity and persists.
    ///
    /// The tracker is notified before the write and its outcome is ignored, so
    /// a failed notification never blocks the update.
    fn record_click(&mut self, id: RestaurantId) -> Result<ClickHistory, StorageError> {
        if let Some(tracker) = &self.tracker {
            tracker.notify_click(id);
        }

        let mut history = self.load();
        history.touch(id, self.capacity);
        self.persist(&history)?;

        debug!(%id, len = history.len(), "click recorded");
        Ok(history)
    }

    fn most_recent(&self) -> Option<RestaurantId> {
        self.load().most_recent()
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.persist(&ClickHistory::new())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
