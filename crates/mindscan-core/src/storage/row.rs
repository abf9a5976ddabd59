//! Entry row type for database queries.

use chrono::NaiveDateTime;

use crate::error::{MindscanError, Result};
use crate::storage::types::EntryRecord;

/// Raw row data from a windowed entries query, before parsing.
#[derive(Debug)]
pub struct EntryRow {
    pub created_at: String,
    pub sentiment: Option<f64>,
    pub emotion: Option<String>,
    pub text: Option<String>,
}

impl EntryRow {
    pub fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            created_at: row.get(0)?,
            sentiment: row.get(1)?,
            emotion: row.get(2)?,
            text: row.get(3)?,
        })
    }
}

/// Parse a stored `created_at` value.
///
/// Accepts the `T`-separated ISO-8601 form with or without fractional
/// seconds, and the space-separated form SQLite's own `datetime()` emits.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| MindscanError::Storage(format!("Invalid timestamp '{}': {}", value, e)))
}

impl TryFrom<EntryRow> for EntryRecord {
    type Error = MindscanError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let created_at = parse_timestamp(&row.created_at)?;

        Ok(EntryRecord {
            created_at,
            sentiment: row.sentiment,
            emotion: row.emotion,
            text: row.text,
        })
    }
}
