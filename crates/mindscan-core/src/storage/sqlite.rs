//! SQLite-backed entry and account store.
//!
//! The store holds a path, not a connection. Every operation opens its own
//! short-lived connection, runs, and drops it; concurrency is whatever
//! SQLite's file locking allows, softened by a busy timeout.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension};

use crate::credentials::{hash_password, verify_password, PasswordScheme};
use crate::error::{MindscanError, Result};
use crate::storage::row::EntryRow;
use crate::storage::schema::{
    ensure_tables, migrate_entries_table_within, needs_rebuild, table_columns, MigrationOutcome,
};
use crate::storage::traits::{AccountStore, EntryStore};
use crate::storage::types::{format_timestamp, EntryRecord, NewEntry, User};

/// Default SQLite busy timeout.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a connection waits on a locked database before failing
    pub busy_timeout: Duration,

    /// Wall-clock cap on the startup migration (`None` = unbounded)
    pub migration_timeout: Option<Duration>,

    /// Scheme used to hash passwords of new accounts
    pub password_scheme: PasswordScheme,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            migration_timeout: None,
            password_scheme: PasswordScheme::default(),
        }
    }
}

/// Entry and account store over a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: StoreOptions,
    migration: MigrationOutcome,
}

impl SqliteStore {
    /// Open (creating if needed) the store at `path` and migrate it.
    ///
    /// This must happen before any read or write in the process. The
    /// returned store remembers what the migration did.
    ///
    /// # Errors
    ///
    /// Returns `MindscanError::Migration` if the entries table cannot be
    /// brought to the canonical shape, or `Sqlite`/`Io` if the file cannot
    /// be opened or created. Both are fatal.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut conn = connect(&path, &options)?;
        ensure_tables(&conn)?;
        let migration = migrate_entries_table_within(&mut conn, options.migration_timeout)?;

        Ok(Self {
            path,
            options,
            migration,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// What the startup migration did.
    pub fn migration(&self) -> &MigrationOutcome {
        &self.migration
    }

    fn connect(&self) -> Result<Connection> {
        connect(&self.path, &self.options)
    }

    /// Live column names of the entries table, in declaration order.
    pub fn entries_columns(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        table_columns(&conn, "entries")
    }

    /// Verify both tables have the expected shape.
    ///
    /// # Errors
    ///
    /// Returns `MindscanError::Storage` describing the first problem found.
    pub fn check_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        let entries = table_columns(&conn, "entries")?;
        if entries.is_empty() || needs_rebuild(&entries) {
            return Err(MindscanError::Storage(format!(
                "entries table is not canonical: {:?}",
                entries
            )));
        }

        let users = table_columns(&conn, "users")?;
        for required in ["id", "username", "password"] {
            if !users.iter().any(|c| c == required) {
                return Err(MindscanError::Storage(format!(
                    "users table missing column '{}'",
                    required
                )));
            }
        }

        let unique_usernames: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM pragma_index_list('users') il
            JOIN pragma_index_info(il.name) ii
            WHERE il."unique" = 1 AND ii.name = 'username'
            "#,
            [],
            |row| row.get(0),
        )?;
        if unique_usernames == 0 {
            return Err(MindscanError::Storage(
                "users.username has no unique index".to_string(),
            ));
        }

        let integrity: String = conn.query_row("PRAGMA quick_check", [], |row| row.get(0))?;
        if integrity != "ok" {
            return Err(MindscanError::Storage(format!(
                "SQLite quick_check failed: {}",
                integrity
            )));
        }

        Ok(())
    }

    /// Number of entries with no owner.
    ///
    /// These predate per-user scoping and are invisible to
    /// [`EntryStore::fetch_entries`].
    pub fn orphaned_entry_count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE user_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Look up an account by username.
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.connect()?;
        let user = conn
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?",
                [username],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(user.map(|(id, username, password)| User {
            id,
            username,
            password_hash: password.unwrap_or_default(),
        }))
    }
}

fn connect(path: &Path, options: &StoreOptions) -> Result<Connection> {
    tracing::debug!(path = %path.display(), "opening store connection");
    let conn = Connection::open(path)?;
    conn.busy_timeout(options.busy_timeout)?;
    Ok(conn)
}

impl EntryStore for SqliteStore {
    fn insert_entry(&self, entry: &NewEntry) -> Result<i64> {
        let conn = self.connect()?;
        let created_at = entry
            .created_at
            .unwrap_or_else(|| Local::now().naive_local());

        conn.execute(
            r#"
            INSERT INTO entries (user_id, text, sentiment, emotion, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
            (
                entry.user_id,
                &entry.text,
                entry.sentiment,
                &entry.emotion,
                format_timestamp(&created_at),
            ),
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn fetch_entries(&self, user_id: i64, days: u32) -> Result<Vec<EntryRecord>> {
        let conn = self.connect()?;
        // A window reaching past the calendar covers the whole history.
        let since = Local::now()
            .naive_local()
            .checked_sub_signed(chrono::Duration::days(i64::from(days)))
            .unwrap_or(NaiveDateTime::MIN);

        let mut stmt = conn.prepare(
            r#"
            SELECT created_at, sentiment, emotion, text
            FROM entries
            WHERE user_id = ? AND created_at >= ?
            ORDER BY created_at ASC
            "#,
        )?;
        let rows = stmt.query_map((user_id, format_timestamp(&since)), EntryRow::from_sql)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }
}

impl AccountStore for SqliteStore {
    fn add_user(&self, username: &str, password: &str) -> Result<bool> {
        let password_hash = hash_password(password, self.options.password_scheme)?;
        let conn = self.connect()?;

        let inserted = conn
            .execute(
                "INSERT INTO users (username, password) VALUES (?, ?)",
                (username, password_hash),
            )
            .map_err(MindscanError::from);

        match inserted {
            Ok(_) => Ok(true),
            Err(err) if err.is_unique_violation() => {
                tracing::warn!(username, "signup rejected: username already taken");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn check_user(&self, username: &str, password: &str) -> Result<Option<i64>> {
        let user = self.find_user(username)?;
        Ok(user
            .filter(|user| verify_password(password, &user.password_hash))
            .map(|user| user.id))
    }
}
