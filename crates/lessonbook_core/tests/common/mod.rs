#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use futures::channel::oneshot;
use lessonbook_core::backend::{BackendAdapter, BackendError, BackendResult, FixtureBackend};
use lessonbook_core::model::holder::{
    Group, Holder, HolderRef, LessonSchedule, LessonTime, Student, Weekday,
};
use lessonbook_core::model::note::{Note, NoteDraft};
use lessonbook_core::model::todo::{Todo, TodoDraft};
use lessonbook_core::model::{Entity, EntityId};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

pub const OWNER: &str = "teacher-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchAll,
    Create,
    Update,
    Remove,
    BulkRemove,
}

/// Fixture backend with scripted failures and manually released calls.
///
/// Whether a call fails is decided when it starts, so a held call keeps the
/// outcome that was scripted at the time it was issued.
pub struct ScriptedBackend<T: Entity> {
    inner: FixtureBackend<T>,
    failing: RefCell<HashSet<Op>>,
    holds: RefCell<VecDeque<oneshot::Receiver<()>>>,
    calls: RefCell<Vec<Op>>,
}

impl<T: Entity> ScriptedBackend<T> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<T>) -> Self {
        Self {
            inner: FixtureBackend::with_rows(rows),
            failing: RefCell::new(HashSet::new()),
            holds: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn fail_on(&self, op: Op) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.borrow_mut().remove(&op);
    }

    /// Parks the next call until the returned sender fires (or is dropped).
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds.borrow_mut().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.borrow().clone()
    }

    pub fn rows(&self) -> Vec<T> {
        self.inner.rows()
    }

    async fn enter(&self, op: Op) -> BackendResult<()> {
        self.calls.borrow_mut().push(op);
        let fail = self.failing.borrow().contains(&op);
        let hold = self.holds.borrow_mut().pop_front();
        if let Some(release) = hold {
            let _ = release.await;
        }
        if fail {
            return Err(BackendError::Unavailable(format!("scripted {op:?} failure")));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl<T: Entity> BackendAdapter<T> for ScriptedBackend<T> {
    async fn fetch_all(&self, owner_id: &str) -> BackendResult<Vec<T>> {
        self.enter(Op::FetchAll).await?;
        self.inner.fetch_all(owner_id).await
    }

    async fn create(&self, draft: &T::Draft) -> BackendResult<T> {
        self.enter(Op::Create).await?;
        self.inner.create(draft).await
    }

    async fn update(&self, entity: &T) -> BackendResult<T> {
        self.enter(Op::Update).await?;
        self.inner.update(entity).await
    }

    async fn remove(&self, id: EntityId) -> BackendResult<()> {
        self.enter(Op::Remove).await?;
        self.inner.remove(id).await
    }

    async fn bulk_remove(&self, ids: &[EntityId]) -> BackendResult<()> {
        self.enter(Op::BulkRemove).await?;
        self.inner.bulk_remove(ids).await
    }
}

/// `"2024-05-15 09:00"` as a local instant. 2024-05-13 is a Monday.
pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
}

pub fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn slot(weekday: Weekday, start: &str) -> LessonSchedule {
    LessonSchedule::weekly(weekday, start.parse::<LessonTime>().unwrap())
}

pub fn student(first: &str, last: &str, schedule: LessonSchedule) -> Student {
    Student {
        id: Uuid::new_v4(),
        owner_id: OWNER.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        instrument: "Posaune".to_string(),
        schedule,
        archived: false,
    }
}

pub fn group(name: &str, schedule: LessonSchedule) -> Group {
    Group {
        id: Uuid::new_v4(),
        owner_id: OWNER.to_string(),
        name: name.to_string(),
        schedule,
        archived: false,
    }
}

pub fn scheduled(last: &str, weekday: Weekday, start: &str) -> Holder {
    Holder::Student(student("Alex", last, slot(weekday, start)))
}

pub fn unscheduled(last: &str) -> Holder {
    Holder::Student(student("Alex", last, LessonSchedule::default()))
}

pub fn todo_draft(text: &str) -> TodoDraft {
    TodoDraft {
        owner_id: OWNER.to_string(),
        text: text.to_string(),
        due: None,
        holder: None,
    }
}

pub fn todo(text: &str) -> Todo {
    Todo::from_draft(Uuid::new_v4(), &todo_draft(text))
}

pub fn note(holder: HolderRef, title: &str, order: u32) -> Note {
    Note::from_draft(
        Uuid::new_v4(),
        &NoteDraft {
            owner_id: OWNER.to_string(),
            holder,
            title: title.to_string(),
            text: String::new(),
            order,
            background_color: None,
        },
    )
}

pub fn last_names(holders: &[Holder]) -> Vec<&str> {
    holders.iter().map(|holder| holder.sort_names().0).collect()
}
