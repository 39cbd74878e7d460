//! Configuration data structures for topicgraph.
//!
//! Defines the YAML config format: storage location, default query policy
//! and the logging filter. Every section has serde defaults so partial files
//! load cleanly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for topicgraph.
///
/// Loaded from a YAML file, then overridden by environment variables and
/// CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicGraphConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TopicGraphConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            storage: StorageConfig::default(),
            query: QueryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TopicGraphConfig {
    /// Database file to open, falling back to `topics.db` in the working
    /// directory.
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Default database file name.
pub const DEFAULT_DB_FILE: &str = "topics.db";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Redirect every id to the latest version of its topic.
    #[serde(default = "default_only_latest")]
    pub only_latest: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            only_latest: default_only_latest(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_only_latest() -> bool {
    true
}

fn default_log_filter() -> String {
    "topicgraph=info".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
