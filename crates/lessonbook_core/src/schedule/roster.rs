//! Roster ordering by upcoming lesson time.
//!
//! # Invariants
//! - Scheduled holders come first, ordered by weekday rank, start minute and
//!   name; unscheduled holders follow, ordered by name.
//! - Sorting is stable, so holders with identical keys keep input order.
//! - The input slice is never mutated.

use crate::model::holder::Holder;
use crate::schedule::clock::{weekday_rank, DAYS_PER_WEEK};
use chrono::NaiveDateTime;

/// Name sort key: folded names first, raw names as final tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameKey {
    primary: String,
    secondary: String,
    raw_primary: String,
    raw_secondary: String,
}

impl NameKey {
    /// Last name then first name for students, group name for groups.
    pub fn of(holder: &Holder) -> Self {
        let (primary, secondary) = holder.sort_names();
        Self::from_parts(primary, secondary)
    }

    pub(crate) fn from_parts(primary: &str, secondary: &str) -> Self {
        Self {
            primary: collation_key(primary),
            secondary: collation_key(secondary),
            raw_primary: primary.to_string(),
            raw_secondary: secondary.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SlotKey {
    rank: u8,
    start_minute: u16,
    name: NameKey,
}

impl SlotKey {
    fn of(holder: &Holder, now: NaiveDateTime) -> Self {
        let schedule = holder.schedule();
        Self {
            rank: schedule
                .weekday
                .map_or(DAYS_PER_WEEK, |weekday| weekday_rank(weekday, now)),
            start_minute: schedule.start_time.map_or(0, |time| time.minutes()),
            name: NameKey::of(holder),
        }
    }
}

/// Returns holders ordered by their next lesson relative to `now`.
pub fn sort_by_lesson_time(holders: &[Holder], now: NaiveDateTime) -> Vec<Holder> {
    sorted_refs(holders, now).into_iter().cloned().collect()
}

pub(crate) fn sorted_refs<'a>(
    holders: impl IntoIterator<Item = &'a Holder>,
    now: NaiveDateTime,
) -> Vec<&'a Holder> {
    let (mut scheduled, mut unscheduled): (Vec<&Holder>, Vec<&Holder>) =
        holders.into_iter().partition(|holder| holder.is_scheduled());

    scheduled.sort_by_cached_key(|holder| SlotKey::of(holder, now));
    unscheduled.sort_by_cached_key(|holder| NameKey::of(holder));
    scheduled.extend(unscheduled);
    scheduled
}

/// Lowercases and folds German umlauts so `Müller` sorts with `Muller`.
pub(crate) fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for ch in value.trim().chars().flat_map(char::to_lowercase) {
        match ch {
            'ä' => key.push('a'),
            'ö' => key.push('o'),
            'ü' => key.push('u'),
            'ß' => key.push_str("ss"),
            other => key.push(other),
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::collation_key;

    #[test]
    fn collation_key_folds_umlauts_and_case() {
        assert_eq!(collation_key("Müller"), "muller");
        assert_eq!(collation_key(" Strauß "), "strauss");
        assert_eq!(collation_key("ÖZTÜRK"), "ozturk");
    }
}
