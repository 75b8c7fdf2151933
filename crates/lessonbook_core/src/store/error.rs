//! Store error taxonomy.

use crate::backend::BackendError;
use crate::model::validation::ValidationError;
use crate::model::{Entity, EntityId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<R, T> = Result<R, StoreError<T>>;

/// Mutation kinds, as named in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Remove,
    BulkRemove,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::BulkRemove => "bulk_remove",
        }
    }
}

/// Original input of a mutation, returned on failure so callers can re-issue
/// it unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T: Entity> {
    Create(T::Draft),
    Update(T),
    Remove(EntityId),
    BulkRemove(Vec<EntityId>),
}

impl<T: Entity> Mutation<T> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Create(_) => MutationKind::Create,
            Self::Update(_) => MutationKind::Update,
            Self::Remove(_) => MutationKind::Remove,
            Self::BulkRemove(_) => MutationKind::BulkRemove,
        }
    }
}

/// Backend rejection of an optimistic mutation. The local apply has already
/// been rolled back when this is returned.
#[derive(Debug)]
pub struct RemoteFailure<T: Entity> {
    pub input: Mutation<T>,
    pub reason: BackendError,
}

#[derive(Debug)]
pub enum StoreError<T: Entity> {
    /// Rejected before any local apply or backend call.
    Validation(ValidationError),
    /// `update`/`remove` targeted an id the collection does not hold.
    UnknownId(EntityId),
    /// Backend rejected the mutation; local state was rolled back.
    Remote(RemoteFailure<T>),
    /// Initial `fetch_all` failed; the collection is unchanged.
    Fetch(BackendError),
}

impl<T: Entity> StoreError<T> {
    /// Original input when the failure came from the backend.
    pub fn mutation(&self) -> Option<&Mutation<T>> {
        match self {
            Self::Remote(failure) => Some(&failure.input),
            _ => None,
        }
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl<T: Entity> Display for StoreError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownId(id) => write!(f, "{} has no record {id}", T::COLLECTION),
            Self::Remote(failure) => write!(
                f,
                "{} {} rolled back: {}",
                T::COLLECTION,
                failure.input.kind().as_str(),
                failure.reason
            ),
            Self::Fetch(err) => write!(f, "{} fetch failed: {err}", T::COLLECTION),
        }
    }
}

impl<T: Entity> Error for StoreError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Remote(failure) => Some(&failure.reason),
            Self::Fetch(err) => Some(err),
            Self::UnknownId(_) => None,
        }
    }
}

impl<T: Entity> From<ValidationError> for StoreError<T> {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
