//! # Mindscan Core
//!
//! Core library for Mindscan - a private, local-first mood journal.
//!
//! This crate owns everything with real invariants: the SQLite persistence
//! layer and its schema migrator, the account store, and the fusion of
//! text and image classifier readings into one sentiment/emotion pair.
//! Presentation (the CLI) and the classifiers themselves live outside.
//!
//! ## Architecture
//!
//! - **storage**: Entry and account stores over one SQLite file, plus the
//!   entries-table migrator
//! - **credentials**: Password hashing, verification and validation
//! - **fusion**: Multi-modal signal fusion and the classifier contracts
//! - **trend**: Summaries over a window of entries
//! - **session**: Request-scoped authenticated user context

pub mod credentials;
pub mod error;
pub mod fusion;
pub mod session;
pub mod storage;
pub mod trend;

pub use error::{MindscanError, Result};
pub use fusion::{combine, FusedSignal, ModalityReading};
pub use session::Session;
pub use storage::{AccountStore, EntryStore, SqliteStore, StoreOptions};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
