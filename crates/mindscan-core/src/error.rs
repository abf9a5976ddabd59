//! Error types for Mindscan core operations.
//!
//! Duplicate usernames and classifier failures are not errors here: the
//! account store reports the former as `Ok(false)` and the fuser models the
//! latter as an absent reading. What remains is fatal to the operation.

use thiserror::Error;

/// Result type alias for Mindscan operations.
pub type Result<T> = std::result::Result<T, MindscanError>;

/// Core error type for Mindscan operations.
#[derive(Debug, Error)]
pub enum MindscanError {
    /// The entries table could not be brought to its canonical shape
    #[error("Migration error: {0}")]
    Migration(String),

    /// Stored data could not be decoded into domain types
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error (open, permissions, I/O, constraints)
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Password hashing failed
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MindscanError {
    /// Whether this error is a SQLite UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            MindscanError::Sqlite {
                source: rusqlite::Error::SqliteFailure(err, _),
            } => err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            _ => false,
        }
    }
}
