//! SQLite bootstrap for the durable slot database.
//!
//! # Responsibility
//! - Open and configure the SQLite connection backing the durable slot.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Table layout version is tracked via `PRAGMA user_version`; it is
//!   independent of the `schemaVersion` tag inside the state blob.
//! - No slot is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Slot database failure, tagged with the bootstrap step that hit it.
#[derive(Debug)]
pub enum DbError {
    /// The connection could not be established. `path` is `None` in memory.
    Open {
        path: Option<PathBuf>,
        source: rusqlite::Error,
    },
    /// Migration `version` failed; the transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::Sqlite(_) => "db_query_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_version_unsupported",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open {
                path: Some(path),
                source,
            } => write!(f, "cannot open slot database `{}`: {source}", path.display()),
            Self::Open { path: None, source } => {
                write!(f, "cannot open in-memory slot database: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "slot migration {version} failed: {source}")
            }
            Self::Sqlite(err) => write!(f, "slot query: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
