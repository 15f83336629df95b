//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-value get/set over named slots.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `set` replaces any previous value for the key (no partial updates).
//! - Empty keys are rejected before reaching storage.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
    InvalidData(String),
    /// Backend can no longer serve requests (e.g. its worker died).
    Unavailable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Unavailable(details) => write!(f, "storage unavailable: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-value storage addressed by string keys.
pub trait KvStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `RepoError::Db` when the connection has not been migrated.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_kv_table(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        validate_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        validate_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

fn validate_key(key: &str) -> RepoResult<()> {
    if key.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn ensure_kv_table(conn: &Connection) -> RepoResult<()> {
    conn.query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{KvStore, RepoError, SqliteKvStore};
    use crate::db::open_db_in_memory;

    fn store() -> SqliteKvStore {
        SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn missing_key_reads_as_none() {
        assert_eq!(store().get("notes").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = store();
        store.set("notes", "[1]").unwrap();
        store.set("notes", "[2]").unwrap();
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("[2]"));

        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = store().set("", "x").unwrap_err();
        assert!(matches!(err, RepoError::InvalidKey(_)));
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = SqliteKvStore::try_new(conn).err().unwrap();
        assert!(matches!(err, RepoError::Db(_)));
    }
}
