//! Deterministic in-memory backend for demo/sandbox mode.
//!
//! # Invariants
//! - No I/O; every future resolves on first poll.
//! - Canonical ids are allocated from a counter, so runs are reproducible.
//! - Validation and not-found semantics match the live backend.

use crate::backend::{BackendAdapter, BackendError, BackendResult};
use crate::model::{Entity, EntityId};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use uuid::Uuid;

/// First id handed out for records created at runtime. Seeded demo rows use
/// small ids well below this range.
const RUNTIME_ID_BASE: u128 = 0x1000_0000;

/// In-memory adapter holding one collection.
#[derive(Debug)]
pub struct FixtureBackend<T> {
    rows: RefCell<Vec<T>>,
    next_seq: Cell<u128>,
}

impl<T: Entity> Default for FixtureBackend<T> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<T: Entity> FixtureBackend<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the collection with `rows` in the given order.
    pub fn with_rows(rows: Vec<T>) -> Self {
        Self {
            rows: RefCell::new(rows),
            next_seq: Cell::new(0),
        }
    }

    /// Copy of every stored row, regardless of owner.
    pub fn rows(&self) -> Vec<T> {
        self.rows.borrow().clone()
    }

    fn allocate_id(&self) -> EntityId {
        let seq = self.next_seq.get() + 1;
        self.next_seq.set(seq);
        Uuid::from_u128(RUNTIME_ID_BASE + seq)
    }
}

#[async_trait(?Send)]
impl<T: Entity> BackendAdapter<T> for FixtureBackend<T> {
    async fn fetch_all(&self, owner_id: &str) -> BackendResult<Vec<T>> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|row| row.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &T::Draft) -> BackendResult<T> {
        let entity = T::from_draft(self.allocate_id(), draft);
        entity.validate()?;
        self.rows.borrow_mut().push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &T) -> BackendResult<T> {
        entity.validate()?;
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|row| row.id() == entity.id())
            .ok_or(BackendError::NotFound(entity.id()))?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn remove(&self, id: EntityId) -> BackendResult<()> {
        let mut rows = self.rows.borrow_mut();
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(BackendError::NotFound(id))?;
        rows.remove(index);
        Ok(())
    }

    async fn bulk_remove(&self, ids: &[EntityId]) -> BackendResult<()> {
        let mut rows = self.rows.borrow_mut();
        if let Some(missing) = ids
            .iter()
            .find(|id| !rows.iter().any(|row| row.id() == **id))
        {
            return Err(BackendError::NotFound(*missing));
        }
        let targets: HashSet<EntityId> = ids.iter().copied().collect();
        rows.retain(|row| !targets.contains(&row.id()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FixtureBackend;
    use crate::backend::BackendAdapter;
    use crate::model::todo::{Todo, TodoDraft};
    use futures::executor::block_on;

    #[test]
    fn created_ids_are_deterministic() {
        let first = FixtureBackend::<Todo>::new();
        let second = FixtureBackend::<Todo>::new();
        let draft = TodoDraft {
            owner_id: "owner".to_string(),
            text: "tune the cello".to_string(),
            due: None,
            holder: None,
        };

        let a = block_on(first.create(&draft)).unwrap();
        let b = block_on(second.create(&draft)).unwrap();
        assert_eq!(a.id, b.id);
        assert!(!a.id.is_nil());
    }
}
