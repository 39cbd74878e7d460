//! topicgraph: versioned topic hierarchy engine.
//!
//! Models topics as a versioned, parent-linked hierarchy over a pluggable
//! [`store::TopicStore`] and answers tree, path and shortest-path queries
//! over it.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod graph;
pub mod observability;
pub mod store;
pub mod types;
pub mod versioning;

pub use engine::TopicGraph;
pub use error::{Result, StoreError, TopicGraphError};
pub use store::{MemoryTopicStore, SqliteTopicStore, TopicStore};
pub use types::Topic;
pub use versioning::{NewTopic, TopicChanges, TopicVersioning};
