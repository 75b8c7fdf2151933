//! To-do use cases.
//!
//! # Invariants
//! - Completion toggles go through `update`, so a rejected toggle restores
//!   the previous flag.
//! - Open lists keep store order; nothing here reorders the collection.

use crate::backend::BackendAdapter;
use crate::model::holder::HolderRef;
use crate::model::todo::{Todo, TodoDraft};
use crate::model::EntityId;
use crate::store::{OptimisticStore, StoreError, StoreResult};
use chrono::NaiveDate;

pub struct TodoService<'s, A: BackendAdapter<Todo>> {
    store: &'s OptimisticStore<Todo, A>,
}

impl<'s, A: BackendAdapter<Todo>> TodoService<'s, A> {
    pub fn new(store: &'s OptimisticStore<Todo, A>) -> Self {
        Self { store }
    }

    pub fn open(&self) -> Vec<Todo> {
        self.filtered(|todo| !todo.completed)
    }

    pub fn completed(&self) -> Vec<Todo> {
        self.filtered(|todo| todo.completed)
    }

    /// Open to-dos due strictly before `today`.
    pub fn overdue(&self, today: NaiveDate) -> Vec<Todo> {
        self.filtered(|todo| todo.is_overdue(today))
    }

    pub fn for_holder(&self, holder: HolderRef) -> Vec<Todo> {
        self.filtered(|todo| todo.holder == Some(holder))
    }

    pub async fn add(&self, draft: TodoDraft) -> StoreResult<Todo, Todo> {
        self.store.create(draft).await
    }

    pub async fn complete(&self, id: EntityId) -> StoreResult<Todo, Todo> {
        self.set_completed(id, true).await
    }

    pub async fn reactivate(&self, id: EntityId) -> StoreResult<Todo, Todo> {
        self.set_completed(id, false).await
    }

    /// Removes every completed to-do in one batch and returns how many went.
    pub async fn delete_completed(&self) -> StoreResult<usize, Todo> {
        let ids: Vec<EntityId> = self.completed().iter().map(|todo| todo.id).collect();
        let count = ids.len();
        self.store.bulk_remove(ids).await?;
        Ok(count)
    }

    async fn set_completed(&self, id: EntityId, completed: bool) -> StoreResult<Todo, Todo> {
        let mut todo = self.store.get(id).ok_or(StoreError::<Todo>::UnknownId(id))?;
        if todo.completed == completed {
            return Ok(todo);
        }
        todo.completed = completed;
        self.store.update(todo).await
    }

    fn filtered(&self, keep: impl Fn(&Todo) -> bool) -> Vec<Todo> {
        self.store
            .snapshot()
            .into_items()
            .into_iter()
            .filter(|todo| keep(todo))
            .collect()
    }
}
