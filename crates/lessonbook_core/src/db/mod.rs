//! SQLite storage bootstrap for the live backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Bring the `records` schema up to date.
//! - Describe SQLite failures with the step or collection they hit.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Backends must not touch `records` before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// SQLite failure, tagged with what was being done at the time.
#[derive(Debug)]
pub enum DbError {
    /// Database file (or `:memory:`) could not be opened.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Connection setting could not be read or applied.
    Pragma {
        name: &'static str,
        source: rusqlite::Error,
    },
    /// Schema step failed; every pending step was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// File was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Statement against one collection of the `records` table failed.
    Record {
        collection: &'static str,
        op: &'static str,
        source: rusqlite::Error,
    },
}

impl DbError {
    pub(crate) fn record(
        collection: &'static str,
        op: &'static str,
    ) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Record {
            collection,
            op,
            source,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open database {target}: {source}"),
            Self::Pragma { name, source } => write!(f, "pragma {name} failed: {source}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Record {
                collection,
                op,
                source,
            } => write!(f, "{op} on {collection} failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Pragma { source, .. }
            | Self::Migration { source, .. }
            | Self::Record { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}
