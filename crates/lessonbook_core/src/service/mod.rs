//! Use-case services over optimistic stores.
//!
//! # Responsibility
//! - Compose store mutations into teacher-facing operations (archiving,
//!   completing to-dos, keeping note order compact).
//! - Keep callers away from adapter details; services only see stores.

pub mod holder_service;
pub mod lesson_service;
pub mod note_service;
pub mod repertoire_service;
pub mod todo_service;

use crate::model::holder::{Group, Student};
use crate::model::lesson::Lesson;
use crate::model::note::Note;
use crate::model::repertoire::RepertoireItem;
use crate::model::todo::Todo;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use holder_service::HolderService;
pub use lesson_service::LessonService;
pub use note_service::NoteService;
pub use repertoire_service::{RepertoireService, RepertoireSortMethod, RepertoireSorting};
pub use todo_service::TodoService;

/// Store failure from any collection touched by a multi-collection use case.
#[derive(Debug)]
pub enum ServiceError {
    Students(StoreError<Student>),
    Groups(StoreError<Group>),
    Lessons(StoreError<Lesson>),
    Notes(StoreError<Note>),
    Todos(StoreError<Todo>),
    Repertoire(StoreError<RepertoireItem>),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Students(err) => write!(f, "{err}"),
            Self::Groups(err) => write!(f, "{err}"),
            Self::Lessons(err) => write!(f, "{err}"),
            Self::Notes(err) => write!(f, "{err}"),
            Self::Todos(err) => write!(f, "{err}"),
            Self::Repertoire(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Students(err) => Some(err),
            Self::Groups(err) => Some(err),
            Self::Lessons(err) => Some(err),
            Self::Notes(err) => Some(err),
            Self::Todos(err) => Some(err),
            Self::Repertoire(err) => Some(err),
        }
    }
}

macro_rules! service_error_from {
    ($entity:ty => $variant:ident) => {
        impl From<StoreError<$entity>> for ServiceError {
            fn from(value: StoreError<$entity>) -> Self {
                Self::$variant(value)
            }
        }
    };
}

service_error_from!(Student => Students);
service_error_from!(Group => Groups);
service_error_from!(Lesson => Lessons);
service_error_from!(Note => Notes);
service_error_from!(Todo => Todos);
service_error_from!(RepertoireItem => Repertoire);
