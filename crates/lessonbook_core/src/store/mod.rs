//! Optimistic local cache over a backend adapter.
//!
//! # Responsibility
//! - Own one in-memory collection per entity type.
//! - Apply mutations locally before the backend confirms them, and reverse
//!   them when the backend rejects.
//!
//! # Invariants
//! - Every optimistic apply either commits or is fully reversed, and the
//!   caller learns which.
//! - At most one mutation per entity id is in flight.
//! - Readers only ever receive owned snapshots.

pub mod error;
mod gate;
pub mod optimistic;

pub use error::{Mutation, MutationKind, RemoteFailure, StoreError, StoreResult};
pub use optimistic::{MutationState, OptimisticStore, StoreSnapshot};
