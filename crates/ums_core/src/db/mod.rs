//! SQLite persistence behind the local key/value store.
//!
//! # Responsibility
//! - Open connections whose schema holds the `kv_store` table.
//! - Report storage failures through one error type shared by every
//!   [`crate::store::KeyValueStore`] implementation.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - Store keys are non-empty; both the stores and the table enforce it.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Result of a storage operation.
pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening the database or reading/writing a stored value.
#[derive(Debug)]
pub enum DbError {
    /// Error reported by SQLite.
    Sqlite(rusqlite::Error),
    /// The database file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// A store operation was given an empty key.
    EmptyKey,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "database schema version {found} is newer than this build supports ({supported})"
            ),
            Self::EmptyKey => write!(f, "storage key cannot be empty"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::EmptyKey => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Rejects keys the `kv_store` table would refuse.
pub(crate) fn ensure_key(key: &str) -> DbResult<()> {
    if key.is_empty() {
        return Err(DbError::EmptyKey);
    }
    Ok(())
}
