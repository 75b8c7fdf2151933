//! Lesson history per holder.

use crate::backend::BackendAdapter;
use crate::model::holder::HolderRef;
use crate::model::lesson::{Lesson, LessonDraft};
use crate::model::EntityId;
use crate::store::{OptimisticStore, StoreResult};
use std::cmp::Reverse;

pub struct LessonService<'s, A: BackendAdapter<Lesson>> {
    store: &'s OptimisticStore<Lesson, A>,
}

impl<'s, A: BackendAdapter<Lesson>> LessonService<'s, A> {
    pub fn new(store: &'s OptimisticStore<Lesson, A>) -> Self {
        Self { store }
    }

    /// Lessons of `holder`, newest date first; same-day entries by creation
    /// time, newest first.
    pub fn lessons_of(&self, holder: HolderRef) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .store
            .items()
            .into_iter()
            .filter(|lesson| lesson.holder == holder)
            .collect();
        lessons.sort_by_key(|lesson| Reverse((lesson.date, lesson.created_at)));
        lessons
    }

    pub fn latest(&self, holder: HolderRef, limit: usize) -> Vec<Lesson> {
        let mut lessons = self.lessons_of(holder);
        lessons.truncate(limit);
        lessons
    }

    pub async fn record(&self, draft: LessonDraft) -> StoreResult<Lesson, Lesson> {
        self.store.create(draft).await
    }

    pub async fn revise(&self, lesson: Lesson) -> StoreResult<Lesson, Lesson> {
        self.store.update(lesson).await
    }

    pub async fn delete(&self, id: EntityId) -> StoreResult<(), Lesson> {
        self.store.remove(id).await
    }
}
