//! Error types for the topic graph.
//!
//! [`StoreError`] is what a storage backend reports. [`TopicGraphError`] is
//! what the engine surfaces to its callers; store failures are wrapped with
//! the name of the operation that hit them.

use thiserror::Error;

/// Failure reported by a [`TopicStore`](crate::store::TopicStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("record {0} already exists")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the engine and the surrounding crate.
#[derive(Debug, Error)]
pub enum TopicGraphError {
    #[error("topic not found: {0}")]
    NotFound(String),

    #[error("circular reference detected at topic {0}")]
    CircularReference(String),

    #[error("{operation} failed: {source}")]
    Lookup {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("topic {0} still has children")]
    HasChildren(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TopicGraphError>;

/// Attach the failing operation's name to a store result.
pub trait LookupContext<T> {
    fn during(self, operation: &'static str) -> Result<T>;
}

impl<T> LookupContext<T> for std::result::Result<T, StoreError> {
    fn during(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| TopicGraphError::Lookup { operation, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_context_names_the_operation() {
        let failed: std::result::Result<(), StoreError> =
            Err(StoreError::Unavailable("timeout".into()));
        let err = failed.during("resolve tree root").unwrap_err();
        assert_eq!(
            err.to_string(),
            "resolve tree root failed: store unavailable: timeout"
        );
        assert!(matches!(
            err,
            TopicGraphError::Lookup {
                operation: "resolve tree root",
                ..
            }
        ));
    }

    #[test]
    fn not_found_and_cycle_messages() {
        assert_eq!(
            TopicGraphError::NotFound("t1".into()).to_string(),
            "topic not found: t1"
        );
        assert_eq!(
            TopicGraphError::CircularReference("t2".into()).to_string(),
            "circular reference detected at topic t2"
        );
    }
}
