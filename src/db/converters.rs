//! Row <-> domain conversions for the topics table.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use crate::error::StoreError;
use crate::types::Topic;

/// Column list in the order [`row_to_topic`] expects for `SELECT *`.
pub const TOPIC_COLUMNS: &str = "id, base_topic_id, name, content, description, version, \
is_latest, parent_topic_id, created_at, updated_at, created_by";

fn parse_timestamp(id: &str, column: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: format!("bad {column} '{raw}': {e}"),
        })
}

/// Convert a `topics` row into a [`Topic`].
pub fn row_to_topic(row: &Row<'_>) -> Result<Topic, StoreError> {
    let id: String = row.get("id")?;
    let created_raw: String = row.get("created_at")?;
    let updated_raw: String = row.get("updated_at")?;
    let version: i64 = row.get("version")?;
    let version = u32::try_from(version).map_err(|_| StoreError::Corrupt {
        id: id.clone(),
        reason: format!("version {version} out of range"),
    })?;

    Ok(Topic {
        base_topic_id: row.get("base_topic_id")?,
        name: row.get("name")?,
        content: row.get("content")?,
        description: row.get("description")?,
        version,
        is_latest: row.get::<_, i64>("is_latest")? != 0,
        parent_topic_id: row.get("parent_topic_id")?,
        created_at: parse_timestamp(&id, "created_at", &created_raw)?,
        updated_at: parse_timestamp(&id, "updated_at", &updated_raw)?,
        created_by: row.get("created_by")?,
        id,
    })
}

/// Serialize a timestamp the way [`row_to_topic`] parses it.
pub fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}
