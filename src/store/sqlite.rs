//! SQLite-backed topic store.
//!
//! Every query goes through [`Connection::prepare_cached`]; the only dynamic
//! statement is `find`, whose `WHERE` clause depends on the filter shape and
//! is also cached per shape.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode};

use crate::db::converters::{row_to_topic, timestamp_to_sql, TOPIC_COLUMNS};
use crate::db::schema::initialize_database;
use crate::error::StoreError;
use crate::store::{StoreResult, TopicStore};
use crate::types::{ParentMatch, Topic, TopicFilter, TopicPatch};

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const INSERT_TOPIC_SQL: &str = "\
INSERT INTO topics (id, base_topic_id, name, content, description, version, is_latest, parent_topic_id, created_at, updated_at, created_by)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

const UPDATE_TOPIC_SQL: &str = "\
UPDATE topics SET
  name = ?2,
  content = ?3,
  description = ?4,
  is_latest = ?5,
  updated_at = ?6
WHERE id = ?1";

const DELETE_TOPIC_SQL: &str = "DELETE FROM topics WHERE id = ?1";

const COUNT_TOPICS_SQL: &str = "SELECT COUNT(*) FROM topics";

// ---------------------------------------------------------------------------
// SqliteTopicStore
// ---------------------------------------------------------------------------

/// Topic store over a single SQLite connection.
///
/// Rows come back in `rowid` order, which is insertion order.
pub struct SqliteTopicStore {
    pub conn: Connection,
}

impl std::fmt::Debug for SqliteTopicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTopicStore").finish_non_exhaustive()
    }
}

/// Build the `SELECT` for `filter` together with its bound values.
fn build_find_query(filter: &TopicFilter) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(ref base) = filter.base_topic_id {
        values.push(Value::Text(base.clone()));
        // Records without a base id are their own base. Spelled out so
        // idx_topics_base stays usable.
        let n = values.len();
        clauses.push(format!(
            "(base_topic_id = ?{n} OR (base_topic_id IS NULL AND id = ?{n}))"
        ));
    }
    match &filter.parent {
        ParentMatch::Any => {}
        ParentMatch::Absent => clauses.push("parent_topic_id IS NULL".to_string()),
        ParentMatch::Is(parent) => {
            values.push(Value::Text(parent.clone()));
            clauses.push(format!("parent_topic_id = ?{}", values.len()));
        }
    }
    if let Some(latest) = filter.is_latest {
        values.push(Value::Integer(latest as i64));
        clauses.push(format!("is_latest = ?{}", values.len()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (
        format!("SELECT {TOPIC_COLUMNS} FROM topics{where_sql} ORDER BY rowid ASC"),
        values,
    )
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl SqliteTopicStore {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// A fresh in-memory database, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(":memory:")
    }

    /// Total number of stored topic versions.
    pub fn count(&self) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row(COUNT_TOPICS_SQL, [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// Insert many records inside a single transaction.
    ///
    /// All-or-nothing: a duplicate id rolls back the whole batch.
    pub fn import_topics(&self, topics: &[Topic]) -> StoreResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_TOPIC_SQL)?;
            for topic in topics {
                stmt.execute(params![
                    topic.id,
                    topic.base_topic_id,
                    topic.name,
                    topic.content,
                    topic.description,
                    topic.version,
                    topic.is_latest as i64,
                    topic.parent_topic_id,
                    timestamp_to_sql(&topic.created_at),
                    timestamp_to_sql(&topic.updated_at),
                    topic.created_by,
                ])
                .map_err(|e| {
                    if is_constraint_violation(&e) {
                        StoreError::Duplicate(topic.id.clone())
                    } else {
                        StoreError::Sqlite(e)
                    }
                })?;
            }
        }
        tx.commit()?;
        Ok(topics.len())
    }
}

impl TopicStore for SqliteTopicStore {
    fn create(&self, topic: Topic) -> StoreResult<Topic> {
        let mut stmt = self.conn.prepare_cached(INSERT_TOPIC_SQL)?;
        let inserted = stmt.execute(params![
            topic.id,
            topic.base_topic_id,
            topic.name,
            topic.content,
            topic.description,
            topic.version,
            topic.is_latest as i64,
            topic.parent_topic_id,
            timestamp_to_sql(&topic.created_at),
            timestamp_to_sql(&topic.updated_at),
            topic.created_by,
        ]);
        match inserted {
            Ok(_) => Ok(topic),
            Err(e) if is_constraint_violation(&e) => Err(StoreError::Duplicate(topic.id)),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Topic>> {
        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ?1");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query_and_then(params![id], row_to_topic)?;
        match rows.next() {
            Some(Ok(topic)) => Ok(Some(topic)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn find(&self, filter: &TopicFilter) -> StoreResult<Vec<Topic>> {
        let (sql, values) = build_find_query(filter);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_and_then(params_from_iter(values.iter()), row_to_topic)?;
        rows.collect()
    }

    fn update_by_id(&self, id: &str, patch: &TopicPatch) -> StoreResult<Option<Topic>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(mut topic) = self.find_by_id(id)? else {
            return Ok(None);
        };
        patch.apply(&mut topic);
        {
            let mut stmt = tx.prepare_cached(UPDATE_TOPIC_SQL)?;
            stmt.execute(params![
                topic.id,
                topic.name,
                topic.content,
                topic.description,
                topic.is_latest as i64,
                timestamp_to_sql(&topic.updated_at),
            ])?;
        }
        tx.commit()?;
        Ok(Some(topic))
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let mut stmt = self.conn.prepare_cached(DELETE_TOPIC_SQL)?;
        let deleted = stmt.execute(params![id])?;
        Ok(deleted > 0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
