//! In-process topic store.
//!
//! Keeps records in insertion order behind an `RwLock`, so `find` iterates
//! deterministically and the store can be shared between threads.

use std::sync::RwLock;

use crate::error::StoreError;
use crate::store::{StoreResult, TopicStore};
use crate::types::{Topic, TopicFilter, TopicPatch};

/// Insertion-ordered, lock-protected vector of topics.
#[derive(Debug, Default)]
pub struct MemoryTopicStore {
    records: RwLock<Vec<Topic>>,
}

impl MemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with `topics` in the given order.
    ///
    /// Later duplicates of an id are dropped.
    pub fn with_topics(topics: impl IntoIterator<Item = Topic>) -> Self {
        let store = Self::new();
        for topic in topics {
            if let Err(e) = store.create(topic) {
                tracing::warn!("skipping seed record: {e}");
            }
        }
        store
    }

    /// Number of stored records across all versions.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

impl TopicStore for MemoryTopicStore {
    fn create(&self, topic: Topic) -> StoreResult<Topic> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        if records.iter().any(|t| t.id == topic.id) {
            return Err(StoreError::Duplicate(topic.id));
        }
        records.push(topic.clone());
        Ok(topic)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Topic>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.iter().find(|t| t.id == id).cloned())
    }

    fn find(&self, filter: &TopicFilter) -> StoreResult<Vec<Topic>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.iter().filter(|t| filter.matches(t)).cloned().collect())
    }

    fn update_by_id(&self, id: &str, patch: &TopicPatch) -> StoreResult<Option<Topic>> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        Ok(records.iter_mut().find(|t| t.id == id).map(|topic| {
            patch.apply(topic);
            topic.clone()
        }))
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        let before = records.len();
        records.retain(|t| t.id != id);
        Ok(records.len() != before)
    }
}
