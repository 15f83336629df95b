//! SQLite storage bootstrap for the key-value slot table.
//!
//! # Responsibility
//! - Open and configure SQLite connections for QuickNote core.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Key-value reads/writes happen only on migrated connections.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    /// Connection-level failure (open, pragma, read of `user_version`).
    Sqlite(rusqlite::Error),
    /// The file was written by a binary with newer migrations.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// A migration script failed; the migration transaction was rolled back.
    Migration { version: u32, source: rusqlite::Error },
}

impl DbError {
    /// Stable code used in `db_open` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
            Self::Migration { .. } => "db_migration_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "notes database uses schema {db_version}, this build supports up to {latest_supported}"
            ),
            Self::Migration { version, source } => {
                write!(f, "migration {version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
