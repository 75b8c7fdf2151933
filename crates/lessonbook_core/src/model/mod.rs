//! Domain model for holders and everything scoped to them.
//!
//! # Responsibility
//! - Define canonical records for students, groups, lessons, notes, todos
//!   and repertoire items.
//! - Provide the `Entity` contract consumed by backends and optimistic stores.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil `EntityId`.
//! - Holders are archived (soft delete) in normal flow; dependents always
//!   reference exactly one holder (todos optionally).

pub mod holder;
pub mod lesson;
pub mod note;
pub mod repertoire;
pub mod todo;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use uuid::Uuid;

use self::holder::HolderRef;
use self::validation::ValidationError;

/// Stable identifier shared by every entity type.
pub type EntityId = Uuid;

/// Contract for records synchronized through a backend adapter.
///
/// `Draft` is the partial shape handed to `create`: every field except the
/// identifier, which the backend assigns.
pub trait Entity: Clone + Debug + PartialEq + Serialize + DeserializeOwned + 'static {
    type Draft: Clone + Debug + PartialEq + Serialize;

    /// Collection name used for storage and log events.
    const COLLECTION: &'static str;

    fn id(&self) -> EntityId;

    fn owner_id(&self) -> &str;

    /// Materializes a record from a draft under the given id.
    fn from_draft(id: EntityId, draft: &Self::Draft) -> Self;

    /// Checks record invariants. Called before any optimistic apply and by
    /// backends before persistence.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Records that belong to a holder.
pub trait HolderScoped {
    fn holder(&self) -> Option<HolderRef>;
}

pub(crate) fn require_id(id: EntityId) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId);
    }
    Ok(())
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
