mod common;

use common::at;
use futures::executor::block_on;
use lessonbook_core::backend::demo::{self, DEMO_OWNER_ID};
use lessonbook_core::db::open_db_in_memory;
use lessonbook_core::model::holder::{HolderRef, StudentDraft, Weekday};
use lessonbook_core::model::note::NoteDraft;
use lessonbook_core::model::todo::TodoDraft;
use lessonbook_core::{BackendMode, LessonSchedule, LessonTime, Workspace, WorkspaceError};

#[test]
fn demo_workspace_loads_seed_data() {
    let workspace = Workspace::demo();
    let loaded = block_on(workspace.load(DEMO_OWNER_ID)).unwrap();

    assert_eq!(workspace.mode(), BackendMode::Demo);
    assert_eq!(workspace.students().len(), demo::students().len());
    assert_eq!(workspace.groups().len(), demo::groups().len());
    assert_eq!(
        loaded,
        demo::students().len()
            + demo::groups().len()
            + demo::lessons().len()
            + demo::notes().len()
            + demo::todos().len()
            + demo::repertoire().len()
    );
}

#[test]
fn demo_roster_points_at_nearest_lesson() {
    let workspace = Workspace::demo();
    block_on(workspace.load(DEMO_OWNER_ID)).unwrap();

    // Wednesday morning: Weber at 16:30 is the next lesson.
    let mut roster = workspace.roster(at("2024-05-15 09:00"));

    let names: Vec<String> = roster.active().iter().map(|holder| holder.display_name()).collect();
    assert_eq!(
        names,
        [
            "Emma Weber",
            "Felix Bauer",
            "Fortgeschrittene Posaunenspieler",
            "Posaunenchor der Gemeinde",
            "Lisa Müller",
            "Max Schmidt",
            "Anfänger Posaunengruppe",
            "Sophie Klein",
        ]
    );
    assert_eq!(roster.nearest_index(), Some(0));
    assert_eq!(roster.inactive().len(), 1);
    assert_eq!(roster.inactive()[0].display_name(), "Luca Hoffmann");

    assert_eq!(roster.previous().unwrap().display_name(), "Sophie Klein");
    assert_eq!(roster.next().unwrap().display_name(), "Emma Weber");
    assert_eq!(roster.next().unwrap().display_name(), "Felix Bauer");

    let choir = demo::group_ref(2).type_id();
    assert!(roster.select(&choir));
    assert_eq!(
        roster.current_holder().unwrap().display_name(),
        "Posaunenchor der Gemeinde"
    );
    assert!(!roster.select("s-unknown"));
    roster.reset_to_nearest();
    assert_eq!(roster.current_index(), Some(0));
}

#[test]
fn roster_type_ids_follow_holder_kind() {
    let workspace = Workspace::demo();
    block_on(workspace.load(DEMO_OWNER_ID)).unwrap();
    let roster = workspace.roster(at("2024-05-15 09:00"));

    let type_ids = roster.type_ids();
    assert_eq!(type_ids.len(), roster.active().len());
    assert!(type_ids.contains(&demo::student_ref(2).type_id()));
    assert!(type_ids.contains(&demo::group_ref(0).type_id()));
    assert!(type_ids.iter().all(|id| id.starts_with("s-") || id.starts_with("g-")));
}

#[test]
fn other_owners_see_an_empty_demo() {
    let workspace = Workspace::demo();
    assert_eq!(block_on(workspace.load("teacher-2")).unwrap(), 0);

    let roster = workspace.roster(at("2024-05-15 09:00"));
    assert!(roster.active().is_empty());
    assert_eq!(roster.current_index(), None);
}

#[test]
fn delete_holders_cascades_to_dependents() {
    let workspace = Workspace::demo();
    block_on(workspace.load(DEMO_OWNER_ID)).unwrap();
    let lisa = demo::student_ref(0);
    let beginners = demo::group_ref(0);

    let report = block_on(workspace.delete_holders(&[lisa, beginners, lisa])).unwrap();

    assert_eq!(report.holders, 2);
    assert_eq!(report.lessons, 3);
    assert_eq!(report.notes, 4);
    assert_eq!(report.repertoire, 1);
    assert_eq!(report.todos, 0);
    assert!(workspace.students().get(lisa.id).is_none());
    assert!(workspace.groups().get(beginners.id).is_none());
    assert!(workspace
        .notes()
        .items()
        .iter()
        .all(|note| note.holder != lisa && note.holder != beginners));
}

#[test]
fn delete_unknown_holder_changes_nothing() {
    let workspace = Workspace::demo();
    block_on(workspace.load(DEMO_OWNER_ID)).unwrap();
    let before = workspace.lessons().len();
    let ghost = HolderRef::student(uuid::Uuid::new_v4());

    let result = block_on(workspace.delete_holders(&[demo::student_ref(0), ghost]));

    assert!(result.is_err());
    assert_eq!(workspace.lessons().len(), before);
    assert!(workspace.students().get(demo::student_ref(0).id).is_some());
}

#[test]
fn live_workspace_requires_connection() {
    assert!(matches!(
        Workspace::compose(BackendMode::Live, None),
        Err(WorkspaceError::MissingConnection)
    ));
}

#[test]
fn live_workspace_round_trips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let workspace = Workspace::compose(BackendMode::Live, Some(&conn)).unwrap();
    assert_eq!(block_on(workspace.load("teacher-1")).unwrap(), 0);

    let student = block_on(workspace.students().create(StudentDraft {
        owner_id: "teacher-1".to_string(),
        first_name: "Jonas".to_string(),
        last_name: "Vogel".to_string(),
        instrument: "Horn".to_string(),
        schedule: LessonSchedule::weekly(Weekday::Thursday, LessonTime::from_hm(15, 45).unwrap()),
        archived: false,
    }))
    .unwrap();
    let holder = HolderRef::student(student.id);
    let notes = workspace.note_service();
    block_on(notes.add(NoteDraft {
        owner_id: "teacher-1".to_string(),
        holder,
        title: "Ansatz".to_string(),
        text: String::new(),
        order: 7,
        background_color: None,
    }))
    .unwrap();
    block_on(workspace.todo_service().add(TodoDraft {
        owner_id: "teacher-1".to_string(),
        text: "Noten kopieren".to_string(),
        due: None,
        holder: Some(holder),
    }))
    .unwrap();

    let reopened = Workspace::live(&conn);
    assert_eq!(block_on(reopened.load("teacher-1")).unwrap(), 3);
    assert_eq!(reopened.students().items(), vec![student]);
    assert_eq!(reopened.note_service().notes_of(holder)[0].order, 0);

    let report = block_on(reopened.delete_holders(&[holder])).unwrap();
    assert_eq!((report.notes, report.todos), (1, 1));
    assert_eq!(block_on(Workspace::live(&conn).load("teacher-1")).unwrap(), 0);
}
