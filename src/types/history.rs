use serde::Serialize;

use super::restaurant::RestaurantId;

/// Bounded, duplicate-free list of clicked restaurants, oldest first.
///
/// The most recently clicked id is always last. Every constructor and
/// mutation keeps the list within its capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClickHistory {
    ids: Vec<RestaurantId>,
}

impl ClickHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from ids in click order.
    ///
    /// A repeated id keeps its latest position, and only the last `capacity`
    /// ids survive, so replaying clicks through `from_ids` matches `touch`.
    pub fn from_ids<I>(ids: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = RestaurantId>,
    {
        let mut history = Self::new();
        for id in ids {
            history.touch(id, capacity);
        }
        history
    }

    /// Moves `id` to the most-recent position, inserting it if absent, then
    /// drops the oldest entries beyond `capacity`.
    pub fn touch(&mut self, id: RestaurantId, capacity: usize) {
        self.ids.retain(|existing| *existing != id);
        self.ids.push(id);
        if self.ids.len() > capacity {
            let excess = self.ids.len() - capacity;
            self.ids.drain(..excess);
        }
    }

    pub fn most_recent(&self) -> Option<RestaurantId> {
        self.ids.last().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[RestaurantId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestaurantId> {
        self.ids.iter()
    }
}
