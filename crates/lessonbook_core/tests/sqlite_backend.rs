mod common;

use common::{group, note, slot, student, OWNER};
use futures::executor::block_on;
use lessonbook_core::backend::{BackendAdapter, BackendError, SqliteBackend};
use lessonbook_core::db::{open_db, open_db_in_memory};
use lessonbook_core::model::holder::{Group, HolderRef, Student, StudentDraft, Weekday};
use lessonbook_core::model::note::Note;
use lessonbook_core::model::validation::ValidationError;
use lessonbook_core::{LessonSchedule, OptimisticStore};
use rusqlite::params;

fn draft(first: &str, last: &str) -> StudentDraft {
    StudentDraft {
        owner_id: OWNER.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        instrument: "Posaune".to_string(),
        schedule: slot(Weekday::Tuesday, "16:15"),
        archived: false,
    }
}

#[test]
fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lessonbook.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let backend = SqliteBackend::<Student>::new(&conn);
        let first = block_on(backend.create(&draft("Mia", "Kraus"))).unwrap();
        let second = block_on(backend.create(&draft("Ben", "Roth"))).unwrap();
        vec![first, second]
    };

    let conn = open_db(&path).unwrap();
    let backend = SqliteBackend::<Student>::new(&conn);
    assert_eq!(block_on(backend.fetch_all(OWNER)).unwrap(), created);
}

#[test]
fn collections_do_not_leak_into_each_other() {
    let conn = open_db_in_memory().unwrap();
    let students = SqliteBackend::<Student>::new(&conn);
    let groups = SqliteBackend::<Group>::new(&conn);

    block_on(students.create(&draft("Mia", "Kraus"))).unwrap();
    let choir = group("Posaunenchor", slot(Weekday::Saturday, "10:00"));
    let stored = block_on(groups.update(&choir)).unwrap_err();
    assert!(matches!(stored, BackendError::NotFound(id) if id == choir.id));

    assert_eq!(block_on(students.fetch_all(OWNER)).unwrap().len(), 1);
    assert!(block_on(groups.fetch_all(OWNER)).unwrap().is_empty());
}

#[test]
fn invalid_records_are_rejected_on_write() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::<Student>::new(&conn);

    let mut bad = draft("Mia", " ");
    bad.schedule = LessonSchedule::default();
    let err = block_on(backend.create(&bad)).unwrap_err();

    assert!(matches!(
        err,
        BackendError::Validation(ValidationError::BlankField("last_name"))
    ));
    assert!(block_on(backend.fetch_all(OWNER)).unwrap().is_empty());
}

#[test]
fn corrupt_bodies_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::<Student>::new(&conn);
    let mia = block_on(backend.create(&draft("Mia", "Kraus"))).unwrap();

    conn.execute(
        "UPDATE records SET body = ?1 WHERE id = ?2;",
        params![r#"{"id": "not-a-uuid"}"#, mia.id.to_string()],
    )
    .unwrap();

    assert!(matches!(
        block_on(backend.fetch_all(OWNER)),
        Err(BackendError::InvalidData(_))
    ));
}

#[test]
fn mismatched_body_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::<Student>::new(&conn);
    let mia = block_on(backend.create(&draft("Mia", "Kraus"))).unwrap();
    let other = student("Ben", "Roth", LessonSchedule::default());

    conn.execute(
        "UPDATE records SET body = ?1 WHERE id = ?2;",
        params![serde_json::to_string(&other).unwrap(), mia.id.to_string()],
    )
    .unwrap();

    assert!(matches!(
        block_on(backend.fetch_all(OWNER)),
        Err(BackendError::InvalidData(message)) if message.contains("mismatched")
    ));
}

#[test]
fn store_rolls_back_when_sqlite_rejects() {
    let conn = open_db_in_memory().unwrap();
    let holder = HolderRef::student(uuid::Uuid::new_v4());
    let kept = note(holder, "kept", 0);
    conn.execute(
        "INSERT INTO records (collection, id, owner_id, body) VALUES ('notes', ?1, ?2, ?3);",
        params![
            kept.id.to_string(),
            OWNER,
            serde_json::to_string(&kept).unwrap()
        ],
    )
    .unwrap();

    let store = OptimisticStore::new(SqliteBackend::<Note>::new(&conn));
    block_on(store.load(OWNER)).unwrap();
    conn.execute("DELETE FROM records;", []).unwrap();

    let err = block_on(store.remove(kept.id)).unwrap_err();

    assert!(err.is_rolled_back());
    assert_eq!(store.items(), vec![kept]);
}
