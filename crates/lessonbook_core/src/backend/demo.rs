//! Seed data for demo mode.
//!
//! All rows belong to [`DEMO_OWNER_ID`] and use fixed ids so the sandbox
//! looks the same on every start.

use crate::model::holder::{Group, HolderRef, LessonSchedule, LessonTime, Student, Weekday};
use crate::model::lesson::{Lesson, LessonStatus};
use crate::model::note::{Note, NoteBackground};
use crate::model::repertoire::RepertoireItem;
use crate::model::todo::Todo;
use crate::model::EntityId;
use chrono::NaiveDate;
use uuid::Uuid;

pub const DEMO_OWNER_ID: &str = "demo-user";

const STUDENT_BASE: u128 = 0x100;
const GROUP_BASE: u128 = 0x200;
const LESSON_BASE: u128 = 0x300;
const NOTE_BASE: u128 = 0x400;
const TODO_BASE: u128 = 0x500;
const REPERTOIRE_BASE: u128 = 0x600;

// (first, last, instrument, weekday, start, minutes, archived)
const STUDENT_ROWS: &[(&str, &str, &str, Option<Weekday>, (u16, u16), u16, bool)] = &[
    ("Lisa", "Müller", "Posaune", Some(Weekday::Monday), (14, 0), 45, false),
    ("Max", "Schmidt", "Trompete", Some(Weekday::Monday), (15, 0), 30, false),
    ("Emma", "Weber", "Posaune", Some(Weekday::Wednesday), (16, 30), 45, false),
    ("Felix", "Bauer", "Tuba", Some(Weekday::Thursday), (17, 0), 30, false),
    ("Sophie", "Klein", "Euphonium", None, (0, 0), 30, false),
    ("Luca", "Hoffmann", "Posaune", Some(Weekday::Friday), (15, 15), 45, true),
];

// (name, weekday, start, minutes)
const GROUP_ROWS: &[(&str, Weekday, (u16, u16), u16)] = &[
    ("Anfänger Posaunengruppe", Weekday::Tuesday, (16, 0), 60),
    ("Fortgeschrittene Posaunenspieler", Weekday::Thursday, (18, 0), 60),
    ("Posaunenchor der Gemeinde", Weekday::Saturday, (10, 0), 90),
];

fn id(base: u128, index: usize) -> EntityId {
    Uuid::from_u128(base + index as u128 + 1)
}

fn day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn schedule(weekday: Option<Weekday>, start: (u16, u16), minutes: u16) -> LessonSchedule {
    match weekday {
        Some(weekday) => {
            let start_time = LessonTime::hm(start.0, start.1);
            let end_minutes = start_time.minutes() + minutes;
            LessonSchedule {
                weekday: Some(weekday),
                start_time: Some(start_time),
                end_time: Some(LessonTime::hm(end_minutes / 60, end_minutes % 60)),
                duration_minutes: Some(minutes),
                location: Some("Musikschule".to_string()),
            }
        }
        None => LessonSchedule {
            duration_minutes: Some(minutes),
            ..LessonSchedule::default()
        },
    }
}

pub fn student_ref(index: usize) -> HolderRef {
    HolderRef::student(id(STUDENT_BASE, index))
}

pub fn group_ref(index: usize) -> HolderRef {
    HolderRef::group(id(GROUP_BASE, index))
}

pub fn students() -> Vec<Student> {
    STUDENT_ROWS
        .iter()
        .enumerate()
        .map(
            |(index, (first, last, instrument, weekday, start, minutes, archived))| Student {
                id: id(STUDENT_BASE, index),
                owner_id: DEMO_OWNER_ID.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                instrument: instrument.to_string(),
                schedule: schedule(*weekday, *start, *minutes),
                archived: *archived,
            },
        )
        .collect()
}

pub fn groups() -> Vec<Group> {
    GROUP_ROWS
        .iter()
        .enumerate()
        .map(|(index, (name, weekday, start, minutes))| Group {
            id: id(GROUP_BASE, index),
            owner_id: DEMO_OWNER_ID.to_string(),
            name: name.to_string(),
            schedule: schedule(Some(*weekday), *start, *minutes),
            archived: false,
        })
        .collect()
}

/// Three past lessons per active student.
pub fn lessons() -> Vec<Lesson> {
    let weeks = [day(2024, 5, 6), day(2024, 5, 13), day(2024, 5, 20)];
    let mut lessons = Vec::new();
    for (student_index, _) in STUDENT_ROWS.iter().enumerate().filter(|(_, row)| !row.6) {
        for (week_index, date) in weeks.iter().enumerate() {
            let Some(date) = *date else { continue };
            let Some(created_at) = date.and_hms_opt(18, 0, 0) else {
                continue;
            };
            lessons.push(Lesson {
                id: id(LESSON_BASE, student_index * weeks.len() + week_index),
                owner_id: DEMO_OWNER_ID.to_string(),
                holder: student_ref(student_index),
                date,
                content: format!("Tonleitern, Etüde Nr. {}", week_index + 1),
                homework: "Lippenbindungen täglich 10 Minuten".to_string(),
                status: LessonStatus::Held,
                created_at,
            });
        }
    }
    lessons
}

pub fn notes() -> Vec<Note> {
    let palette = [
        Some(NoteBackground::Yellow),
        Some(NoteBackground::Blue),
        None,
    ];
    (0..3)
        .map(|index| Note {
            id: id(NOTE_BASE, index),
            owner_id: DEMO_OWNER_ID.to_string(),
            holder: student_ref(0),
            title: format!("Infos {}", index + 1),
            text: "Übt gern mit Play-Along.".to_string(),
            order: index as u32,
            background_color: palette[index],
        })
        .chain(std::iter::once(Note {
            id: id(NOTE_BASE, 3),
            owner_id: DEMO_OWNER_ID.to_string(),
            holder: group_ref(0),
            title: "Noten".to_string(),
            text: "Stimmen für das Sommerkonzert kopieren.".to_string(),
            order: 0,
            background_color: Some(NoteBackground::Green),
        }))
        .collect()
}

pub fn todos() -> Vec<Todo> {
    vec![
        Todo {
            id: id(TODO_BASE, 0),
            owner_id: DEMO_OWNER_ID.to_string(),
            text: "Mundstück für Felix bestellen".to_string(),
            due: day(2024, 5, 10),
            completed: false,
            holder: Some(student_ref(3)),
        },
        Todo {
            id: id(TODO_BASE, 1),
            owner_id: DEMO_OWNER_ID.to_string(),
            text: "Vorspiel planen".to_string(),
            due: day(2024, 6, 28),
            completed: false,
            holder: None,
        },
        Todo {
            id: id(TODO_BASE, 2),
            owner_id: DEMO_OWNER_ID.to_string(),
            text: "Raum für Gruppenprobe reservieren".to_string(),
            due: None,
            completed: true,
            holder: Some(group_ref(2)),
        },
    ]
}

pub fn repertoire() -> Vec<RepertoireItem> {
    vec![
        RepertoireItem {
            id: id(REPERTOIRE_BASE, 0),
            owner_id: DEMO_OWNER_ID.to_string(),
            holder: student_ref(0),
            title: "Saint-Saëns: Cavatine".to_string(),
            start_date: day(2024, 3, 4),
            end_date: None,
        },
        RepertoireItem {
            id: id(REPERTOIRE_BASE, 1),
            owner_id: DEMO_OWNER_ID.to_string(),
            holder: student_ref(2),
            title: "Bordogni: Melodious Etudes Nr. 1".to_string(),
            start_date: day(2024, 1, 8),
            end_date: day(2024, 4, 22),
        },
    ]
}
