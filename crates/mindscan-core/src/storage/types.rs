//! Core data types for the storage layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default lookback, in days, for windowed entry queries.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Encoding for `entries.created_at`.
///
/// Local wall-clock time without offset, fixed-width microseconds, so that
/// SQLite's text comparison orders rows chronologically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Encode a timestamp the way `entries.created_at` stores it.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// A registered account.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Stored digest (SHA-256 hex or an Argon2 PHC string)
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Builder for a journal entry about to be persisted.
///
/// The store writes `sentiment` verbatim; keeping it within `[-1, 1]` is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: i64,
    pub text: String,
    pub sentiment: f64,
    pub emotion: String,

    /// Defaults to the local clock at insert time
    pub created_at: Option<NaiveDateTime>,
}

impl NewEntry {
    pub fn new(
        user_id: i64,
        text: impl Into<String>,
        sentiment: f64,
        emotion: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            text: text.into(),
            sentiment,
            emotion: emotion.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// One row of a windowed history query.
///
/// Columns are nullable because rows carried over from older table shapes
/// may lack them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub created_at: NaiveDateTime,
    pub sentiment: Option<f64>,
    pub emotion: Option<String>,
    pub text: Option<String>,
}
