//! Store trait definitions.
//!
//! `EntryStore` and `AccountStore` are independent: accounts never touch
//! entries and entries only carry a user id. `SqliteStore` implements both
//! over one file.

use crate::error::Result;
use crate::storage::types::{EntryRecord, NewEntry, DEFAULT_WINDOW_DAYS};

/// Journal entry persistence.
pub trait EntryStore {
    /// Insert one entry, returning its row id.
    ///
    /// Values are written verbatim; an out-of-range sentiment is stored
    /// as given.
    fn insert_entry(&self, entry: &NewEntry) -> Result<i64>;

    /// Return `user_id`'s entries created within the last `days` days,
    /// oldest first.
    ///
    /// Rows without an owner are never returned. An empty window yields an
    /// empty vector.
    fn fetch_entries(&self, user_id: i64, days: u32) -> Result<Vec<EntryRecord>>;

    /// Append an entry stamped with the current local time.
    fn save_entry(&self, user_id: i64, text: &str, sentiment: f64, emotion: &str) -> Result<()> {
        self.insert_entry(&NewEntry::new(user_id, text, sentiment, emotion))?;
        Ok(())
    }

    /// [`EntryStore::fetch_entries`] over the default seven-day window.
    fn fetch_recent_entries(&self, user_id: i64) -> Result<Vec<EntryRecord>> {
        self.fetch_entries(user_id, DEFAULT_WINDOW_DAYS)
    }
}

/// Account creation and verification.
pub trait AccountStore {
    /// Register a user.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when created, `Ok(false)` when the username is taken.
    ///
    /// # Errors
    ///
    /// Any storage failure other than the uniqueness violation.
    fn add_user(&self, username: &str, password: &str) -> Result<bool>;

    /// Verify credentials, returning the user id on success.
    ///
    /// An unknown username and a wrong password both yield `Ok(None)`.
    fn check_user(&self, username: &str, password: &str) -> Result<Option<i64>>;
}
