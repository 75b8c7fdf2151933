//! Generic optimistic entity store.
//!
//! # Responsibility
//! - Apply create/update/remove/bulk-remove locally, then confirm through the
//!   backend adapter.
//! - Restore the exact prior state (value and position) when the adapter
//!   rejects.
//!
//! # Invariants
//! - Per id: Idle -> Applying -> Committed | RolledBack.
//! - A mutation on an id that is Applying waits for it to settle first.
//! - `load` replaces the collection only while no mutation is in flight.
//! - Rollback reinserts relative to surviving neighbours, never by a stale
//!   index, and never duplicates an id.
//! - Interior state is never borrowed across an await point.
//!
//! # See also
//! - `store::gate` for the per-id serialization primitive.

use crate::backend::BackendAdapter;
use crate::model::{Entity, EntityId};
use crate::store::error::{Mutation, MutationKind, RemoteFailure, StoreError, StoreResult};
use crate::store::gate::MutationGate;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Lifecycle of the latest mutation issued against one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// No mutation has been issued since the collection was loaded.
    Idle,
    /// Applied locally, waiting for the backend.
    Applying,
    /// Backend confirmed the mutation.
    Committed,
    /// Backend rejected the mutation and the local apply was reversed.
    RolledBack,
}

/// Owned, immutable view of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    items: Vec<T>,
    pending: BTreeSet<EntityId>,
}

impl<T: Entity> StoreSnapshot<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// True while a mutation on `id` waits for the backend.
    pub fn is_pending(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
struct StoreState<T> {
    items: Vec<T>,
    states: HashMap<EntityId, MutationState>,
}

impl<T: Entity> StoreState<T> {
    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn mark(&mut self, ids: &[EntityId], state: MutationState) {
        for id in ids {
            self.states.insert(*id, state);
        }
    }

    fn order(&self) -> Vec<EntityId> {
        self.items.iter().map(Entity::id).collect()
    }

    /// Puts a removed record back where it sat in `order`.
    ///
    /// The record goes before the first later neighbour that is still
    /// present, else after the closest earlier one. Neighbours removed in the
    /// meantime are skipped, so other ids settling in between cannot shift
    /// it. A record whose id is already present is dropped.
    fn reinsert(&mut self, order: &[EntityId], item: T) {
        let id = item.id();
        if self.position(id).is_some() {
            return;
        }
        let at = match order.iter().position(|candidate| *candidate == id) {
            Some(slot) => order[slot + 1..]
                .iter()
                .find_map(|next| self.position(*next))
                .or_else(|| {
                    order[..slot]
                        .iter()
                        .rev()
                        .find_map(|prev| self.position(*prev).map(|index| index + 1))
                })
                .unwrap_or(self.items.len()),
            None => self.items.len(),
        };
        self.items.insert(at, item);
    }
}

/// One entity collection kept in sync with a backend adapter.
pub struct OptimisticStore<T: Entity, A: BackendAdapter<T>> {
    adapter: A,
    state: RefCell<StoreState<T>>,
    gate: MutationGate,
}

impl<T: Entity, A: BackendAdapter<T>> OptimisticStore<T, A> {
    /// Creates an empty store; call [`Self::load`] to fill it.
    pub fn new(adapter: A) -> Self {
        Self::with_items(adapter, Vec::new())
    }

    /// Creates a store primed with already-fetched records.
    pub fn with_items(adapter: A, items: Vec<T>) -> Self {
        Self {
            adapter,
            state: RefCell::new(StoreState {
                items,
                states: HashMap::new(),
            }),
            gate: MutationGate::default(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn snapshot(&self) -> StoreSnapshot<T> {
        let state = self.state.borrow();
        StoreSnapshot {
            items: state.items.clone(),
            pending: state
                .states
                .iter()
                .filter(|(_, state)| **state == MutationState::Applying)
                .map(|(id, _)| *id)
                .collect(),
        }
    }

    /// Copy of the current collection.
    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn get(&self, id: EntityId) -> Option<T> {
        let state = self.state.borrow();
        state.position(id).map(|index| state.items[index].clone())
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state_of(&self, id: EntityId) -> MutationState {
        self.state
            .borrow()
            .states
            .get(&id)
            .copied()
            .unwrap_or(MutationState::Idle)
    }

    /// True while a mutation on `id` is applying or queued behind one.
    pub fn is_busy(&self, id: EntityId) -> bool {
        self.gate.is_busy(id)
    }

    /// Replaces the collection with every record owned by `owner_id`.
    ///
    /// Waits until no mutation is in flight; mutations issued meanwhile
    /// queue behind the load. Returns the number of loaded records. On
    /// failure the collection is left untouched.
    pub async fn load(&self, owner_id: &str) -> StoreResult<usize, T> {
        loop {
            let _pass = self.gate.quiesce().await;
            let seen = self.gate.requests();
            let items = self
                .adapter
                .fetch_all(owner_id)
                .await
                .map_err(StoreError::Fetch)?;
            if self.gate.requests() != seen {
                // A mutation was issued during the fetch; its effect may be
                // missing from `items`.
                debug!(
                    "event=store_load module=store status=retry collection={}",
                    T::COLLECTION
                );
                continue;
            }

            let count = items.len();
            let mut state = self.state.borrow_mut();
            state.items = items;
            state.states.clear();
            debug!(
                "event=store_load module=store status=ok collection={} count={}",
                T::COLLECTION,
                count
            );
            return Ok(count);
        }
    }

    /// Appends a placeholder under a temporary id, then swaps in the
    /// canonical record returned by the backend.
    ///
    /// # Errors
    /// - `StoreError::Validation` before anything is applied.
    /// - `StoreError::Remote` after the placeholder has been removed again.
    pub async fn create(&self, draft: T::Draft) -> StoreResult<T, T> {
        let temp_id = Uuid::new_v4();
        let placeholder = T::from_draft(temp_id, &draft);
        placeholder.validate()?;

        let _pass = self.gate.acquire(&[temp_id]).await;
        {
            let mut state = self.state.borrow_mut();
            state.items.push(placeholder);
            state.mark(&[temp_id], MutationState::Applying);
        }
        log_start::<T>(MutationKind::Create, 1);

        let result = self.adapter.create(&draft).await;

        let mut state = self.state.borrow_mut();
        state.states.remove(&temp_id);
        match result {
            Ok(canonical) => {
                match state.position(temp_id) {
                    Some(index) => state.items[index] = canonical.clone(),
                    None => state.items.push(canonical.clone()),
                }
                state.mark(&[canonical.id()], MutationState::Committed);
                log_commit::<T>(MutationKind::Create, 1);
                Ok(canonical)
            }
            Err(reason) => {
                if let Some(index) = state.position(temp_id) {
                    state.items.remove(index);
                }
                log_rollback::<T>(MutationKind::Create, 1, &reason);
                Err(StoreError::Remote(RemoteFailure {
                    input: Mutation::Create(draft),
                    reason,
                }))
            }
        }
    }

    /// Replaces the record in place, restoring the prior value on failure.
    ///
    /// # Errors
    /// - `StoreError::Validation` before anything is applied.
    /// - `StoreError::UnknownId` when the id is not in the collection.
    /// - `StoreError::Remote` after the prior value has been restored.
    pub async fn update(&self, entity: T) -> StoreResult<T, T> {
        entity.validate()?;
        let id = entity.id();

        let _pass = self.gate.acquire(&[id]).await;
        let prior = {
            let mut state = self.state.borrow_mut();
            let index = state.position(id).ok_or(StoreError::<T>::UnknownId(id))?;
            let prior = std::mem::replace(&mut state.items[index], entity.clone());
            state.mark(&[id], MutationState::Applying);
            prior
        };
        log_start::<T>(MutationKind::Update, 1);

        let result = self.adapter.update(&entity).await;

        let mut state = self.state.borrow_mut();
        match result {
            Ok(canonical) => {
                if let Some(index) = state.position(id) {
                    state.items[index] = canonical.clone();
                }
                state.mark(&[id], MutationState::Committed);
                log_commit::<T>(MutationKind::Update, 1);
                Ok(canonical)
            }
            Err(reason) => {
                if let Some(index) = state.position(id) {
                    state.items[index] = prior;
                }
                state.mark(&[id], MutationState::RolledBack);
                log_rollback::<T>(MutationKind::Update, 1, &reason);
                Err(StoreError::Remote(RemoteFailure {
                    input: Mutation::Update(entity),
                    reason,
                }))
            }
        }
    }

    /// Removes the record, reinserting it at its old position on failure.
    pub async fn remove(&self, id: EntityId) -> StoreResult<(), T> {
        let _pass = self.gate.acquire(&[id]).await;
        let (order, prior) = {
            let mut state = self.state.borrow_mut();
            let index = state.position(id).ok_or(StoreError::<T>::UnknownId(id))?;
            let order = state.order();
            let prior = state.items.remove(index);
            state.mark(&[id], MutationState::Applying);
            (order, prior)
        };
        log_start::<T>(MutationKind::Remove, 1);

        let result = self.adapter.remove(id).await;

        let mut state = self.state.borrow_mut();
        match result {
            Ok(()) => {
                state.mark(&[id], MutationState::Committed);
                log_commit::<T>(MutationKind::Remove, 1);
                Ok(())
            }
            Err(reason) => {
                state.reinsert(&order, prior);
                state.mark(&[id], MutationState::RolledBack);
                log_rollback::<T>(MutationKind::Remove, 1, &reason);
                Err(StoreError::Remote(RemoteFailure {
                    input: Mutation::Remove(id),
                    reason,
                }))
            }
        }
    }

    /// Removes every id as one local operation. If the backend rejects, all
    /// of them are reinserted at their original positions.
    ///
    /// Duplicate ids are ignored; an empty batch is a no-op.
    pub async fn bulk_remove(&self, ids: Vec<EntityId>) -> StoreResult<(), T> {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Ok(());
        }

        let _pass = self.gate.acquire(&unique).await;
        let (order, removed) = {
            let mut state = self.state.borrow_mut();
            let mut positions = Vec::with_capacity(unique.len());
            for id in &unique {
                positions.push(state.position(*id).ok_or(StoreError::<T>::UnknownId(*id))?);
            }
            positions.sort_unstable();

            let order = state.order();
            let mut removed = Vec::with_capacity(positions.len());
            for index in positions.into_iter().rev() {
                removed.push(state.items.remove(index));
            }
            state.mark(&unique, MutationState::Applying);
            (order, removed)
        };
        log_start::<T>(MutationKind::BulkRemove, unique.len());

        let result = self.adapter.bulk_remove(&unique).await;

        let mut state = self.state.borrow_mut();
        match result {
            Ok(()) => {
                state.mark(&unique, MutationState::Committed);
                log_commit::<T>(MutationKind::BulkRemove, unique.len());
                Ok(())
            }
            Err(reason) => {
                // Last first, so each record finds its later neighbour back.
                for item in removed {
                    state.reinsert(&order, item);
                }
                state.mark(&unique, MutationState::RolledBack);
                log_rollback::<T>(MutationKind::BulkRemove, unique.len(), &reason);
                Err(StoreError::Remote(RemoteFailure {
                    input: Mutation::BulkRemove(unique),
                    reason,
                }))
            }
        }
    }
}

fn log_start<T: Entity>(kind: MutationKind, count: usize) {
    debug!(
        "event=store_mutation module=store status=start collection={} op={} count={}",
        T::COLLECTION,
        kind.as_str(),
        count
    );
}

fn log_commit<T: Entity>(kind: MutationKind, count: usize) {
    debug!(
        "event=store_mutation module=store status=ok collection={} op={} count={}",
        T::COLLECTION,
        kind.as_str(),
        count
    );
}

fn log_rollback<T: Entity>(
    kind: MutationKind,
    count: usize,
    reason: &crate::backend::BackendError,
) {
    warn!(
        "event=store_mutation module=store status=rolled_back collection={} op={} count={} error={}",
        T::COLLECTION,
        kind.as_str(),
        count,
        reason
    );
}
