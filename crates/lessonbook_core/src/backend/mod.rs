//! Backend adapter contract and implementations.
//!
//! # Responsibility
//! - Abstract persistence of one entity collection behind `BackendAdapter`.
//! - Provide a live SQLite adapter and a deterministic in-memory fixture.
//! - Offer `Backend`, chosen once at composition time, so stores never
//!   branch on which implementation is active.
//!
//! # Invariants
//! - Adapters validate records before writing them.
//! - `update`/`remove` of an unknown id fail with `BackendError::NotFound`.
//! - `bulk_remove` is all-or-nothing.

pub mod demo;
pub mod fixture;
pub mod sqlite;

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::{Entity, EntityId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use fixture::FixtureBackend;
pub use sqlite::SqliteBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Failure reported by a backend call.
#[derive(Debug)]
pub enum BackendError {
    /// Target record does not exist.
    NotFound(EntityId),
    /// Record failed validation at the persistence boundary.
    Validation(ValidationError),
    /// Backend could not be reached or refused the call.
    Unavailable(String),
    /// Persisted data could not be decoded into a valid record.
    InvalidData(String),
    Db(DbError),
    Codec(serde_json::Error),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "backend unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "record codec failed: {err}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::NotFound(_) | Self::Unavailable(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for BackendError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Remote persistence for one entity type.
///
/// Every call is a suspension point of the calling mutation. Futures are not
/// required to be `Send`: the core runs on one cooperative event loop.
#[async_trait(?Send)]
pub trait BackendAdapter<T: Entity> {
    /// All records owned by `owner_id`, in insertion order.
    async fn fetch_all(&self, owner_id: &str) -> BackendResult<Vec<T>>;

    /// Persists a new record and returns it with its canonical id.
    async fn create(&self, draft: &T::Draft) -> BackendResult<T>;

    /// Replaces an existing record and returns the stored value.
    async fn update(&self, entity: &T) -> BackendResult<T>;

    async fn remove(&self, id: EntityId) -> BackendResult<()>;

    /// Removes every id or none of them.
    async fn bulk_remove(&self, ids: &[EntityId]) -> BackendResult<()>;
}

/// Adapter selected once when the workspace is composed.
pub enum Backend<'conn, T: Entity> {
    Live(SqliteBackend<'conn, T>),
    Demo(FixtureBackend<T>),
}

impl<T: Entity> Backend<'_, T> {
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Live(_) => "live",
            Self::Demo(_) => "demo",
        }
    }
}

#[async_trait(?Send)]
impl<'conn, T: Entity> BackendAdapter<T> for Backend<'conn, T> {
    async fn fetch_all(&self, owner_id: &str) -> BackendResult<Vec<T>> {
        match self {
            Self::Live(backend) => backend.fetch_all(owner_id).await,
            Self::Demo(backend) => backend.fetch_all(owner_id).await,
        }
    }

    async fn create(&self, draft: &T::Draft) -> BackendResult<T> {
        match self {
            Self::Live(backend) => backend.create(draft).await,
            Self::Demo(backend) => backend.create(draft).await,
        }
    }

    async fn update(&self, entity: &T) -> BackendResult<T> {
        match self {
            Self::Live(backend) => backend.update(entity).await,
            Self::Demo(backend) => backend.update(entity).await,
        }
    }

    async fn remove(&self, id: EntityId) -> BackendResult<()> {
        match self {
            Self::Live(backend) => backend.remove(id).await,
            Self::Demo(backend) => backend.remove(id).await,
        }
    }

    async fn bulk_remove(&self, ids: &[EntityId]) -> BackendResult<()> {
        match self {
            Self::Live(backend) => backend.bulk_remove(ids).await,
            Self::Demo(backend) => backend.bulk_remove(ids).await,
        }
    }
}
