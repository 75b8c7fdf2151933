//! Core domain logic for Lessonbook.
//! Roster scheduling and optimistic state sync for teachers' students,
//! groups and everything scoped to them.

pub mod backend;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod schedule;
pub mod service;
pub mod store;
pub mod workspace;

pub use backend::{Backend, BackendAdapter, BackendError, FixtureBackend, SqliteBackend};
pub use config::{BackendMode, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::holder::{Holder, HolderKind, HolderRef, LessonSchedule, LessonTime, Weekday};
pub use model::validation::ValidationError;
pub use model::{Entity, EntityId};
pub use schedule::clock::{minute_of, minutes_of_day, weekday_rank};
pub use schedule::navigation::Roster;
pub use schedule::nearest::compute_nearest_index;
pub use schedule::roster::sort_by_lesson_time;
pub use schedule::sorting::{sort_holders, SortMethod, Sorting};
pub use store::{MutationState, OptimisticStore, StoreError, StoreSnapshot};
pub use workspace::{Workspace, WorkspaceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
