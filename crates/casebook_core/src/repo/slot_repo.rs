//! Slot repository contract and SQLite implementation.
//!
//! # Invariants
//! - Keys are non-empty after trimming.
//! - Values are opaque UTF-8 text; no parsing happens here.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot read/write failure.
#[derive(Debug)]
pub enum RepoError {
    InvalidKey(String),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Db(err) => Some(err),
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

/// Persistent key/value slot storage.
pub trait SlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the whole value stored under `key`.
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes the slot; removing a missing slot is not an error.
    fn clear_slot(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn clear_slot(&self, key: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{RepoError, SlotRepository, SqliteSlotRepository};
    use crate::db::open_db_in_memory;

    #[test]
    fn missing_slot_reads_as_none() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        assert_eq!(repo.read_slot("absent").unwrap(), None);
    }

    #[test]
    fn write_overwrites_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        repo.write_slot("k", "first").unwrap();
        repo.write_slot("k", "second").unwrap();
        assert_eq!(repo.read_slot("k").unwrap().as_deref(), Some("second"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn clear_is_idempotent() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        repo.write_slot("k", "v").unwrap();
        repo.clear_slot("k").unwrap();
        repo.clear_slot("k").unwrap();
        assert_eq!(repo.read_slot("k").unwrap(), None);
    }

    #[test]
    fn blank_key_is_rejected() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        let err = repo.write_slot("  ", "v").unwrap_err();
        assert!(matches!(err, RepoError::InvalidKey(_)));
    }
}
