//! Storage layer for Mindscan.
//!
//! One SQLite file holds two tables, `users` and `entries`. The entries
//! table may arrive in an older shape; [`schema::migrate_entries_table`]
//! rebuilds it before any read or write, and [`SqliteStore::open`] runs
//! that migration once per process.

pub mod row;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use schema::{MigrationOutcome, ENTRIES_COLUMNS};
pub use sqlite::{SqliteStore, StoreOptions};
pub use traits::{AccountStore, EntryStore};
pub use types::{EntryRecord, NewEntry, User, DEFAULT_WINDOW_DAYS};
