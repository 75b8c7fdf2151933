//! Per-id mutation serialization.
//!
//! # Invariants
//! - A pass holds the lock of every id it was acquired for until dropped.
//! - Multi-id passes lock in ascending id order, so overlapping batches
//!   cannot wait on each other in a cycle.
//! - Lock entries are pruned once nobody holds or awaits them.
//! - A quiesced pass covers every id that was in flight when it resolved.

use crate::model::EntityId;
use futures::lock::{Mutex, OwnedMutexGuard};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct MutationGate {
    locks: RefCell<HashMap<EntityId, Arc<Mutex<()>>>>,
    requests: Cell<u64>,
}

impl MutationGate {
    /// Waits until no other pass holds any of `ids`.
    pub(crate) async fn acquire(&self, ids: &[EntityId]) -> GatePass<'_> {
        self.requests.set(self.requests.get() + 1);
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let locks: Vec<Arc<Mutex<()>>> = {
            let mut map = self.locks.borrow_mut();
            ordered
                .iter()
                .map(|id| {
                    Arc::clone(
                        map.entry(*id)
                            .or_insert_with(|| Arc::new(Mutex::new(()))),
                    )
                })
                .collect()
        };

        let mut guards = Vec::with_capacity(locks.len());
        for lock in locks {
            guards.push(lock.lock_owned().await);
        }

        GatePass {
            gate: self,
            ids: ordered,
            guards,
        }
    }

    /// Waits until every mutation in flight has settled.
    ///
    /// The returned pass holds every id that was busy, so mutations queued on
    /// those ids run after it is dropped.
    pub(crate) async fn quiesce(&self) -> GatePass<'_> {
        loop {
            let busy: Vec<EntityId> = self.locks.borrow().keys().copied().collect();
            let pass = self.acquire(&busy).await;
            if self.is_exclusive(&pass) {
                return pass;
            }
        }
    }

    /// Number of passes requested so far, including pending ones.
    pub(crate) fn requests(&self) -> u64 {
        self.requests.get()
    }

    /// True when no id outside `pass` is held or awaited.
    pub(crate) fn is_exclusive(&self, pass: &GatePass<'_>) -> bool {
        self.locks
            .borrow()
            .keys()
            .all(|id| pass.ids.binary_search(id).is_ok())
    }

    /// True while a pass holds or awaits `id`.
    pub(crate) fn is_busy(&self, id: EntityId) -> bool {
        self.locks.borrow().contains_key(&id)
    }
}

/// Exclusive right to mutate a set of ids.
pub(crate) struct GatePass<'a> {
    gate: &'a MutationGate,
    ids: Vec<EntityId>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        self.guards.clear();
        let mut locks = self.gate.locks.borrow_mut();
        for id in &self.ids {
            if locks
                .get(id)
                .is_some_and(|lock| Arc::strong_count(lock) == 1)
            {
                locks.remove(id);
            }
        }
    }
}
