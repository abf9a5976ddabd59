//! Table definitions and the entries-table migrator.
//!
//! The entries table has no stored version number. Its shape is read from
//! the live column list: anything other than exactly [`ENTRIES_COLUMNS`]
//! (in any order), or any table still carrying the obsolete `mood` column,
//! is rebuilt into the canonical shape inside a single transaction.

use std::time::{Duration, Instant};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{MindscanError, Result};

/// Canonical column order of the entries table.
pub const ENTRIES_COLUMNS: [&str; 6] = [
    "id",
    "user_id",
    "text",
    "sentiment",
    "emotion",
    "created_at",
];

const ENTRIES_TABLE: &str = "entries";
const REBUILD_TABLE: &str = "entries_new";
const LEGACY_MOOD_COLUMN: &str = "mood";

/// Instructions between progress-handler checks during a timed migration.
const PROGRESS_INTERVAL: i32 = 1_000;

const USERS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE,
    password TEXT
);
"#;

fn entries_ddl(table: &str, if_not_exists: bool) -> String {
    format!(
        r#"
        CREATE TABLE {}{} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            text TEXT,
            sentiment REAL,
            emotion TEXT,
            created_at TEXT
        );
        "#,
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        table
    )
}

/// Result of a migration check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The table already had the canonical shape; nothing was touched.
    Current,

    /// The table was rebuilt from a legacy shape.
    Rebuilt {
        previous_columns: Vec<String>,
        rows_copied: usize,
    },
}

/// Create both tables if the file is new.
///
/// A fresh entries table is created directly in the canonical shape. An
/// existing one is left alone for [`migrate_entries_table`] to inspect.
pub fn ensure_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(USERS_DDL)?;
    conn.execute_batch(&entries_ddl(ENTRIES_TABLE, true))?;
    Ok(())
}

/// Column names of `table`, in declaration order. Empty if the table is absent.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map([table], |row| row.get::<_, String>(0))?;
    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

/// Whether a table with these columns must be rebuilt.
pub fn needs_rebuild(columns: &[String]) -> bool {
    let has = |name: &str| columns.iter().any(|c| c == name);

    if has(LEGACY_MOOD_COLUMN) || !has("user_id") {
        return true;
    }

    let mut actual: Vec<&str> = columns.iter().map(String::as_str).collect();
    actual.sort_unstable();
    let mut canonical = ENTRIES_COLUMNS.to_vec();
    canonical.sort_unstable();
    actual != canonical
}

/// SELECT list mapping a legacy table onto the canonical columns.
///
/// Columns the source lacks are filled with NULL. `user_id` gets no special
/// treatment.
pub fn select_list(source_columns: &[String]) -> String {
    ENTRIES_COLUMNS
        .iter()
        .map(|column| {
            if source_columns.iter().any(|c| c == column) {
                (*column).to_string()
            } else {
                format!("NULL AS {}", column)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bring the entries table to the canonical shape.
///
/// Detection and rebuild share one IMMEDIATE transaction, so two processes
/// starting at once cannot both rebuild, and a failure at any step leaves
/// the original table in place.
///
/// # Errors
///
/// Returns `MindscanError::Migration` if the table is missing or any step of
/// the rebuild fails. Callers should treat this as fatal.
pub fn migrate_entries_table(conn: &mut Connection) -> Result<MigrationOutcome> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| MindscanError::Migration(format!("Could not begin migration: {}", e)))?;

    let columns = table_columns(&tx, ENTRIES_TABLE)
        .map_err(|e| MindscanError::Migration(format!("Could not inspect entries: {}", e)))?;
    if columns.is_empty() {
        return Err(MindscanError::Migration(
            "entries table does not exist".to_string(),
        ));
    }

    if !needs_rebuild(&columns) {
        tracing::debug!(columns = ?columns, "entries table already canonical");
        return Ok(MigrationOutcome::Current);
    }

    let rows_copied = rebuild(&tx, &columns)
        .map_err(|e| MindscanError::Migration(format!("Rebuild of entries failed: {}", e)))?;
    tx.commit()
        .map_err(|e| MindscanError::Migration(format!("Migration commit failed: {}", e)))?;

    tracing::info!(
        previous = ?columns,
        rows = rows_copied,
        "rebuilt entries table into canonical shape"
    );

    Ok(MigrationOutcome::Rebuilt {
        previous_columns: columns,
        rows_copied,
    })
}

/// Run [`migrate_entries_table`] with an optional wall-clock limit.
///
/// SQLite has no statement timeout, so a progress handler interrupts the
/// copy once `limit` has elapsed; the transaction then rolls back.
pub fn migrate_entries_table_within(
    conn: &mut Connection,
    limit: Option<Duration>,
) -> Result<MigrationOutcome> {
    let Some(limit) = limit else {
        return migrate_entries_table(conn);
    };

    let deadline = Instant::now() + limit;
    conn.progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));
    let outcome = migrate_entries_table(conn);
    conn.progress_handler(0, None::<fn() -> bool>);
    outcome
}

fn rebuild(tx: &Transaction<'_>, source_columns: &[String]) -> rusqlite::Result<usize> {
    // A copy left by an interrupted rebuild is scratch space.
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", REBUILD_TABLE))?;
    tx.execute_batch(&entries_ddl(REBUILD_TABLE, false))?;

    let insert = format!(
        "INSERT INTO {} ({}) SELECT {} FROM {}",
        REBUILD_TABLE,
        ENTRIES_COLUMNS.join(", "),
        select_list(source_columns),
        ENTRIES_TABLE
    );
    let copied = tx.execute(&insert, [])?;

    tx.execute_batch(&format!(
        "DROP TABLE {old}; ALTER TABLE {new} RENAME TO {old};",
        old = ENTRIES_TABLE,
        new = REBUILD_TABLE
    ))?;

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_in_any_order_is_current() {
        assert!(!needs_rebuild(&cols(&ENTRIES_COLUMNS)));
        assert!(!needs_rebuild(&cols(&[
            "created_at",
            "emotion",
            "sentiment",
            "text",
            "user_id",
            "id"
        ])));
    }

    #[test]
    fn test_legacy_shapes_need_rebuild() {
        // pre-accounts shape
        assert!(needs_rebuild(&cols(&[
            "id",
            "text",
            "sentiment",
            "emotion",
            "created_at"
        ])));
        // scoped but still carrying mood
        assert!(needs_rebuild(&cols(&[
            "id",
            "user_id",
            "text",
            "sentiment",
            "emotion",
            "created_at",
            "mood"
        ])));
        // extra unknown column
        assert!(needs_rebuild(&cols(&[
            "id",
            "user_id",
            "text",
            "sentiment",
            "emotion",
            "created_at",
            "note"
        ])));
        // missing a canonical column other than user_id
        assert!(needs_rebuild(&cols(&[
            "id",
            "user_id",
            "text",
            "sentiment",
            "created_at"
        ])));
    }

    #[test]
    fn test_select_list_fills_missing_with_null() {
        let list = select_list(&cols(&["id", "text", "mood", "created_at"]));
        assert_eq!(
            list,
            "id, NULL AS user_id, text, NULL AS sentiment, NULL AS emotion, created_at"
        );
    }

    #[test]
    fn test_migrate_missing_table_fails() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = migrate_entries_table(&mut conn).unwrap_err();
        assert!(matches!(err, MindscanError::Migration(_)));
    }

    #[test]
    fn test_ensure_tables_creates_canonical_entries() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_tables(&conn).unwrap();

        assert_eq!(table_columns(&conn, "entries").unwrap(), cols(&ENTRIES_COLUMNS));
        assert_eq!(
            table_columns(&conn, "users").unwrap(),
            cols(&["id", "username", "password"])
        );
        assert_eq!(
            migrate_entries_table(&mut conn).unwrap(),
            MigrationOutcome::Current
        );
    }

    #[test]
    fn test_timed_migration_rebuilds_within_limit() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE entries (id INTEGER PRIMARY KEY, text TEXT, mood TEXT);
             INSERT INTO entries (text, mood) VALUES ('a', 'ok');",
        )
        .unwrap();

        let outcome =
            migrate_entries_table_within(&mut conn, Some(Duration::from_secs(30))).unwrap();
        assert!(matches!(
            outcome,
            MigrationOutcome::Rebuilt { rows_copied: 1, .. }
        ));
    }

    #[test]
    fn test_timed_migration_interrupts_after_deadline() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE entries (id INTEGER PRIMARY KEY, text TEXT);
             WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 20000)
             INSERT INTO entries (text) SELECT 'row ' || i FROM n;",
        )
        .unwrap();

        let err = migrate_entries_table_within(&mut conn, Some(Duration::ZERO)).unwrap_err();
        assert!(matches!(err, MindscanError::Migration(_)));
        assert_eq!(
            table_columns(&conn, "entries").unwrap(),
            cols(&["id", "text"])
        );
        assert!(table_columns(&conn, "entries_new").unwrap().is_empty());
    }
}
