//! Storage collaborator for topic records.
//!
//! The engine never owns persistence. It borrows something implementing
//! [`TopicStore`] and reads through it; two backends ship with the crate.

pub mod memory;
pub mod sqlite;

use crate::error::StoreError;
use crate::types::{Topic, TopicFilter, TopicPatch};

pub use memory::MemoryTopicStore;
pub use sqlite::SqliteTopicStore;

/// Name of the collection (table) topic records live in.
pub const TOPICS_COLLECTION: &str = "topics";

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Record-level access to the topics collection.
///
/// `find` must return matches in a stable iteration order; sibling order in
/// trees and BFS tie-breaking both follow it.
pub trait TopicStore {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] if the id
    /// is taken.
    fn create(&self, topic: Topic) -> StoreResult<Topic>;

    /// Look up one version by its exact id.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Topic>>;

    /// All records matching `filter`, in store iteration order.
    fn find(&self, filter: &TopicFilter) -> StoreResult<Vec<Topic>>;

    /// Apply `patch` to the record with `id`, returning the updated record.
    fn update_by_id(&self, id: &str, patch: &TopicPatch) -> StoreResult<Option<Topic>>;

    /// Remove the record with `id`. Returns whether anything was deleted.
    fn delete_by_id(&self, id: &str) -> StoreResult<bool>;
}

impl<S: TopicStore + ?Sized> TopicStore for &S {
    fn create(&self, topic: Topic) -> StoreResult<Topic> {
        (**self).create(topic)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Topic>> {
        (**self).find_by_id(id)
    }

    fn find(&self, filter: &TopicFilter) -> StoreResult<Vec<Topic>> {
        (**self).find(filter)
    }

    fn update_by_id(&self, id: &str, patch: &TopicPatch) -> StoreResult<Option<Topic>> {
        (**self).update_by_id(id, patch)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        (**self).delete_by_id(id)
    }
}
