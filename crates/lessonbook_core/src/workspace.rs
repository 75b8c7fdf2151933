//! Composition root.
//!
//! # Responsibility
//! - Build one optimistic store per collection, all on the same backend mode.
//! - Load a teacher's data and expose the roster and services.
//! - Hard-delete holders together with everything scoped to them.
//!
//! # Invariants
//! - The backend mode is fixed for the lifetime of a workspace.
//! - Stores are owned here and only lent out by reference.

use crate::backend::{demo, Backend, FixtureBackend, SqliteBackend};
use crate::config::BackendMode;
use crate::model::holder::{Group, Holder, HolderKind, HolderRef, Student};
use crate::model::lesson::Lesson;
use crate::model::note::Note;
use crate::model::repertoire::RepertoireItem;
use crate::model::todo::Todo;
use crate::model::{Entity, EntityId, HolderScoped};
use crate::schedule::navigation::Roster;
use crate::service::{
    HolderService, LessonService, NoteService, RepertoireService, ServiceError, TodoService,
};
use crate::store::{OptimisticStore, StoreError};
use chrono::NaiveDateTime;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store of `T` on the workspace backend.
pub type WorkspaceStore<'conn, T> = OptimisticStore<T, Backend<'conn, T>>;

#[derive(Debug)]
pub enum WorkspaceError {
    /// Live mode was requested without a database connection.
    MissingConnection,
    Service(ServiceError),
}

impl Display for WorkspaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConnection => write!(f, "live backend requires an open database"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::MissingConnection => None,
        }
    }
}

impl From<ServiceError> for WorkspaceError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Counts of records removed by [`Workspace::delete_holders`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub holders: usize,
    pub lessons: usize,
    pub notes: usize,
    pub todos: usize,
    pub repertoire: usize,
}

pub struct Workspace<'conn> {
    mode: BackendMode,
    students: WorkspaceStore<'conn, Student>,
    groups: WorkspaceStore<'conn, Group>,
    lessons: WorkspaceStore<'conn, Lesson>,
    notes: WorkspaceStore<'conn, Note>,
    todos: WorkspaceStore<'conn, Todo>,
    repertoire: WorkspaceStore<'conn, RepertoireItem>,
}

impl Workspace<'static> {
    /// Sandbox workspace on fixture backends seeded with the demo dataset.
    pub fn demo() -> Self {
        Self {
            mode: BackendMode::Demo,
            students: fixture_store(demo::students()),
            groups: fixture_store(demo::groups()),
            lessons: fixture_store(demo::lessons()),
            notes: fixture_store(demo::notes()),
            todos: fixture_store(demo::todos()),
            repertoire: fixture_store(demo::repertoire()),
        }
    }
}

impl<'conn> Workspace<'conn> {
    /// Workspace persisting into the SQLite database behind `conn`.
    pub fn live(conn: &'conn Connection) -> Self {
        Self {
            mode: BackendMode::Live,
            students: sqlite_store(conn),
            groups: sqlite_store(conn),
            lessons: sqlite_store(conn),
            notes: sqlite_store(conn),
            todos: sqlite_store(conn),
            repertoire: sqlite_store(conn),
        }
    }

    /// Builds the workspace for a configured mode.
    ///
    /// # Errors
    /// - `MissingConnection` when `mode` is live and `conn` is `None`.
    pub fn compose(
        mode: BackendMode,
        conn: Option<&'conn Connection>,
    ) -> Result<Self, WorkspaceError> {
        let workspace: Self = match (mode, conn) {
            (BackendMode::Demo, _) => Workspace::demo(),
            (BackendMode::Live, Some(conn)) => Self::live(conn),
            (BackendMode::Live, None) => return Err(WorkspaceError::MissingConnection),
        };
        info!(
            "event=workspace_compose module=workspace status=ok backend={}",
            workspace.students.adapter().mode_name()
        );
        Ok(workspace)
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    /// Fetches every collection owned by `owner_id`; returns the total
    /// number of records loaded.
    pub async fn load(&self, owner_id: &str) -> Result<usize, WorkspaceError> {
        let (students, groups, lessons, notes, todos, repertoire) = futures::join!(
            self.students.load(owner_id),
            self.groups.load(owner_id),
            self.lessons.load(owner_id),
            self.notes.load(owner_id),
            self.todos.load(owner_id),
            self.repertoire.load(owner_id),
        );
        let total = students.map_err(ServiceError::from)?
            + groups.map_err(ServiceError::from)?
            + lessons.map_err(ServiceError::from)?
            + notes.map_err(ServiceError::from)?
            + todos.map_err(ServiceError::from)?
            + repertoire.map_err(ServiceError::from)?;
        info!(
            "event=workspace_load module=workspace status=ok backend={} records={}",
            self.mode.as_str(),
            total
        );
        Ok(total)
    }

    pub fn students(&self) -> &WorkspaceStore<'conn, Student> {
        &self.students
    }

    pub fn groups(&self) -> &WorkspaceStore<'conn, Group> {
        &self.groups
    }

    pub fn lessons(&self) -> &WorkspaceStore<'conn, Lesson> {
        &self.lessons
    }

    pub fn notes(&self) -> &WorkspaceStore<'conn, Note> {
        &self.notes
    }

    pub fn todos(&self) -> &WorkspaceStore<'conn, Todo> {
        &self.todos
    }

    pub fn repertoire(&self) -> &WorkspaceStore<'conn, RepertoireItem> {
        &self.repertoire
    }

    pub fn holder_service(&self) -> HolderService<'_, Backend<'conn, Student>, Backend<'conn, Group>> {
        HolderService::new(&self.students, &self.groups)
    }

    pub fn lesson_service(&self) -> LessonService<'_, Backend<'conn, Lesson>> {
        LessonService::new(&self.lessons)
    }

    pub fn note_service(&self) -> NoteService<'_, Backend<'conn, Note>> {
        NoteService::new(&self.notes)
    }

    pub fn todo_service(&self) -> TodoService<'_, Backend<'conn, Todo>> {
        TodoService::new(&self.todos)
    }

    pub fn repertoire_service(&self) -> RepertoireService<'_, Backend<'conn, RepertoireItem>> {
        RepertoireService::new(&self.repertoire)
    }

    pub fn holders(&self) -> Vec<Holder> {
        self.holder_service().holders()
    }

    /// Sorted roster for `now`, pointing at the nearest upcoming lesson.
    pub fn roster(&self, now: NaiveDateTime) -> Roster {
        Roster::build(&self.holders(), now)
    }

    /// Hard-deletes holders and every lesson, note, to-do and repertoire
    /// item scoped to them.
    ///
    /// Dependents go first, one batch per collection, so a failure never
    /// leaves dependents pointing at a deleted holder. Batches committed
    /// before a failing one stay committed.
    pub async fn delete_holders(&self, refs: &[HolderRef]) -> Result<CascadeReport, ServiceError> {
        let mut refs = refs.to_vec();
        refs.sort_unstable();
        refs.dedup();
        let refs = refs.as_slice();

        for holder in refs {
            match holder.kind {
                HolderKind::Student if self.students.get(holder.id).is_none() => {
                    return Err(StoreError::<Student>::UnknownId(holder.id).into());
                }
                HolderKind::Group if self.groups.get(holder.id).is_none() => {
                    return Err(StoreError::<Group>::UnknownId(holder.id).into());
                }
                _ => {}
            }
        }

        let lessons = dependents_of(&self.lessons, refs);
        let notes = dependents_of(&self.notes, refs);
        let todos = dependents_of(&self.todos, refs);
        let repertoire = dependents_of(&self.repertoire, refs);
        let (student_ids, group_ids): (Vec<HolderRef>, Vec<HolderRef>) = refs
            .iter()
            .partition(|holder| holder.kind == HolderKind::Student);

        let report = CascadeReport {
            holders: student_ids.len() + group_ids.len(),
            lessons: lessons.len(),
            notes: notes.len(),
            todos: todos.len(),
            repertoire: repertoire.len(),
        };

        self.lessons.bulk_remove(lessons).await?;
        self.notes.bulk_remove(notes).await?;
        self.todos.bulk_remove(todos).await?;
        self.repertoire.bulk_remove(repertoire).await?;
        self.students
            .bulk_remove(student_ids.iter().map(|holder| holder.id).collect())
            .await?;
        self.groups
            .bulk_remove(group_ids.iter().map(|holder| holder.id).collect())
            .await?;

        info!(
            "event=holders_delete module=workspace status=ok holders={} lessons={} notes={} todos={} repertoire={}",
            report.holders, report.lessons, report.notes, report.todos, report.repertoire
        );
        Ok(report)
    }
}

fn fixture_store<T: Entity>(rows: Vec<T>) -> WorkspaceStore<'static, T> {
    OptimisticStore::new(Backend::Demo(FixtureBackend::with_rows(rows)))
}

fn sqlite_store<T: Entity>(conn: &Connection) -> WorkspaceStore<'_, T> {
    OptimisticStore::new(Backend::Live(SqliteBackend::new(conn)))
}

fn dependents_of<T>(store: &WorkspaceStore<'_, T>, refs: &[HolderRef]) -> Vec<EntityId>
where
    T: Entity + HolderScoped,
{
    store
        .items()
        .iter()
        .filter(|item| item.holder().is_some_and(|holder| refs.contains(&holder)))
        .map(Entity::id)
        .collect()
}
