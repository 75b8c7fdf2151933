mod common;

use common::{at, group, last_names, scheduled, slot, student, unscheduled};
use lessonbook_core::model::holder::{Holder, Weekday};
use lessonbook_core::schedule::nearest::minutes_until;
use lessonbook_core::{compute_nearest_index, sort_by_lesson_time, weekday_rank};

fn scenario_holders() -> Vec<Holder> {
    vec![
        scheduled("Bauer", Weekday::Monday, "10:00"),
        scheduled("Klein", Weekday::Wednesday, "14:00"),
        scheduled("Wagner", Weekday::Friday, "09:00"),
    ]
}

#[test]
fn weekday_rank_is_zero_only_for_today() {
    for offset in 0..7 {
        let now = at("2024-05-13 12:00") + chrono::Duration::days(offset);
        for weekday in Weekday::ALL {
            let rank = weekday_rank(weekday, now);
            assert!(rank <= 6);
            let is_today = Weekday::from_chrono(chrono::Datelike::weekday(&now)) == weekday;
            assert_eq!(rank == 0, is_today, "{weekday} at {now}");
        }
    }
}

#[test]
fn nearest_picks_later_lesson_today() {
    let holders = scenario_holders();
    let now = at("2024-05-15 09:00");

    let sorted = sort_by_lesson_time(&holders, now);
    let index = compute_nearest_index(&holders, now).unwrap();

    assert_eq!(last_names(&sorted), ["Klein", "Wagner", "Bauer"]);
    assert_eq!(sorted[index].sort_names().0, "Klein");
}

#[test]
fn nearest_wraps_past_todays_lesson_to_next_week() {
    let holders = scenario_holders();
    let now = at("2024-05-17 10:00");

    let sorted = sort_by_lesson_time(&holders, now);
    let index = compute_nearest_index(&holders, now).unwrap();

    assert_eq!(last_names(&sorted), ["Wagner", "Bauer", "Klein"]);
    assert_eq!(index, 1);
    assert_eq!(sorted[index].sort_names().0, "Bauer");
    assert_eq!(minutes_until(&sorted[0], now), Some(7 * 1440 - 60));
}

#[test]
fn lesson_starting_this_minute_counts_as_next() {
    let holders = scenario_holders();
    let now = at("2024-05-17 09:00");

    let sorted = sort_by_lesson_time(&holders, now);
    let index = compute_nearest_index(&holders, now).unwrap();
    assert_eq!(sorted[index].sort_names().0, "Wagner");
    assert_eq!(minutes_until(&sorted[index], now), Some(0));
}

#[test]
fn same_slot_sorts_by_german_name_order() {
    let holders = vec![
        scheduled("Müller", Weekday::Monday, "10:00"),
        scheduled("Bauer", Weekday::Monday, "10:00"),
    ];
    let sorted = sort_by_lesson_time(&holders, at("2024-05-15 09:00"));
    assert_eq!(last_names(&sorted), ["Bauer", "Müller"]);
}

#[test]
fn umlauts_fold_to_base_letter() {
    let holders = vec![
        scheduled("Mueller", Weekday::Monday, "10:00"),
        scheduled("Mahler", Weekday::Monday, "10:00"),
        scheduled("Müller", Weekday::Monday, "10:00"),
        scheduled("Nagel", Weekday::Monday, "10:00"),
    ];
    let sorted = sort_by_lesson_time(&holders, at("2024-05-15 09:00"));
    assert_eq!(last_names(&sorted), ["Mahler", "Mueller", "Müller", "Nagel"]);
}

#[test]
fn unscheduled_holders_follow_by_name() {
    let holders = vec![
        unscheduled("Zimmer"),
        scheduled("Weber", Weekday::Tuesday, "08:00"),
        unscheduled("Adler"),
        Holder::Group(group("Posaunenchor", slot(Weekday::Saturday, "10:00"))),
    ];
    let sorted = sort_by_lesson_time(&holders, at("2024-05-15 09:00"));

    assert_eq!(
        sorted.iter().map(Holder::display_name).collect::<Vec<_>>(),
        ["Posaunenchor", "Alex Weber", "Alex Adler", "Alex Zimmer"]
    );
}

#[test]
fn sorting_is_idempotent_and_leaves_input_untouched() {
    let holders = vec![
        unscheduled("Zimmer"),
        scheduled("Weber", Weekday::Tuesday, "08:00"),
        scheduled("Bauer", Weekday::Monday, "10:00"),
        scheduled("Klein", Weekday::Wednesday, "14:00"),
    ];
    let before = holders.clone();
    let now = at("2024-05-15 09:00");

    let once = sort_by_lesson_time(&holders, now);
    let twice = sort_by_lesson_time(&once, now);

    assert_eq!(once, twice);
    assert_eq!(holders, before);
}

#[test]
fn sorting_is_stable_for_identical_keys() {
    let first = student("Alex", "Bauer", slot(Weekday::Monday, "10:00"));
    let mut second = first.clone();
    second.id = uuid::Uuid::new_v4();
    let holders = vec![Holder::Student(first.clone()), Holder::Student(second.clone())];

    let sorted = sort_by_lesson_time(&holders, at("2024-05-15 09:00"));
    assert_eq!(sorted[0].id(), first.id);
    assert_eq!(sorted[1].id(), second.id);
}

#[test]
fn ties_resolve_to_roster_order() {
    let holders = vec![
        scheduled("Müller", Weekday::Thursday, "16:00"),
        scheduled("Bauer", Weekday::Thursday, "16:00"),
    ];
    let now = at("2024-05-15 09:00");
    let sorted = sort_by_lesson_time(&holders, now);
    let index = compute_nearest_index(&holders, now).unwrap();
    assert_eq!(index, 0);
    assert_eq!(sorted[index].sort_names().0, "Bauer");
}

#[test]
fn nearest_is_none_without_eligible_holders() {
    let now = at("2024-05-15 09:00");
    assert_eq!(compute_nearest_index(&[], now), None);
    assert_eq!(compute_nearest_index(&[unscheduled("Adler")], now), None);

    let mut archived = student("Alex", "Hoffmann", slot(Weekday::Wednesday, "10:00"));
    archived.archived = true;
    assert_eq!(
        compute_nearest_index(&[Holder::Student(archived)], now),
        None
    );
}

#[test]
fn nearest_skips_archived_and_unscheduled_holders() {
    let mut archived = student("Alex", "Hoffmann", slot(Weekday::Wednesday, "09:30"));
    archived.archived = true;
    let holders = vec![
        Holder::Student(archived),
        unscheduled("Adler"),
        scheduled("Weber", Weekday::Thursday, "08:00"),
        Holder::Group(group("Anfänger", slot(Weekday::Wednesday, "16:00"))),
    ];
    let now = at("2024-05-15 09:00");

    let eligible: Vec<Holder> = holders
        .iter()
        .filter(|holder| !holder.is_archived() && holder.is_scheduled())
        .cloned()
        .collect();
    let sorted = sort_by_lesson_time(&eligible, now);
    let index = compute_nearest_index(&holders, now).unwrap();

    assert_eq!(sorted[index].display_name(), "Anfänger");
}
