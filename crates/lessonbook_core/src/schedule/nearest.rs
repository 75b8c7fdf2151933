//! Nearest upcoming lesson selection.
//!
//! # Invariants
//! - Only active (non-archived), scheduled holders are eligible.
//! - The returned index points into the roster-sorted list of eligible
//!   holders, which is a prefix of the sorted active roster.
//! - Lessons earlier today than the current minute wrap to next week.

use crate::model::holder::Holder;
use crate::schedule::clock::{minute_of, weekday_rank, MINUTES_PER_DAY, MINUTES_PER_WEEK};
use crate::schedule::roster::sorted_refs;
use chrono::NaiveDateTime;

/// Active holder with a weekday.
pub fn is_eligible(holder: &Holder) -> bool {
    !holder.is_archived() && holder.is_scheduled()
}

/// Minutes from `now` until the holder's next lesson start, in
/// `[0, 7 * 1440)`. `None` for unscheduled holders.
pub fn minutes_until(holder: &Holder, now: NaiveDateTime) -> Option<i64> {
    let schedule = holder.schedule();
    let weekday = schedule.weekday?;
    let start = schedule.start_time.map_or(0, |time| time.minutes());

    let mut until = i64::from(weekday_rank(weekday, now)) * MINUTES_PER_DAY + i64::from(start)
        - i64::from(minute_of(now));
    if until < 0 {
        until += MINUTES_PER_WEEK;
    }
    Some(until)
}

/// Index of the holder whose lesson is soonest, or `None` when no holder is
/// eligible. Ties resolve to the earlier roster position.
pub fn compute_nearest_index(holders: &[Holder], now: NaiveDateTime) -> Option<usize> {
    let eligible = sorted_refs(holders.iter().filter(|holder| is_eligible(holder)), now);

    let mut best: Option<(usize, i64)> = None;
    for (index, holder) in eligible.iter().enumerate() {
        let Some(until) = minutes_until(holder, now) else {
            continue;
        };
        if best.map_or(true, |(_, current)| until < current) {
            best = Some((index, until));
        }
    }
    best.map(|(index, _)| index)
}
