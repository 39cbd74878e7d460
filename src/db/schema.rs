//! SQLite schema initialization for the topics collection.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants
// ---------------------------------------------------------------------------

const CREATE_TOPICS: &str = "\
CREATE TABLE IF NOT EXISTS topics (
  id TEXT PRIMARY KEY,
  base_topic_id TEXT,
  name TEXT NOT NULL,
  content TEXT NOT NULL DEFAULT '',
  description TEXT,
  version INTEGER NOT NULL DEFAULT 1,
  is_latest INTEGER NOT NULL DEFAULT 1,
  parent_topic_id TEXT,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL,
  created_by TEXT
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_topics_base ON topics(base_topic_id)",
    "CREATE INDEX IF NOT EXISTS idx_topics_parent ON topics(parent_topic_id)",
    "CREATE INDEX IF NOT EXISTS idx_topics_latest ON topics(is_latest)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the topics
/// schema.
///
/// The returned connection has WAL mode and synchronous NORMAL configured.
/// Foreign keys stay off: `parent_topic_id` references a base identity,
/// which is not a key of any single row.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Tables -----------------------------------------------------------
    conn.execute_batch(CREATE_TOPICS)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
