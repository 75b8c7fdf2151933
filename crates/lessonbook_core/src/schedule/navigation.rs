//! Roster navigation over active holders.
//!
//! # Responsibility
//! - Split holders into the sorted active roster and the archived list.
//! - Track the current holder, starting at the nearest upcoming lesson.
//! - Step forward/backward with wrap-around.
//!
//! # Invariants
//! - `current` is `None` iff the active roster is empty.
//! - Stepping past either end wraps to the other end.

use crate::model::holder::Holder;
use crate::schedule::nearest::compute_nearest_index;
use crate::schedule::roster::{sort_by_lesson_time, NameKey};
use chrono::NaiveDateTime;

/// Next index with wrap-around; `None` for an empty roster.
pub fn next_index(current: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((current + 1) % len)
}

/// Previous index with wrap-around; `None` for an empty roster.
pub fn previous_index(current: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((current % len + len - 1) % len)
}

/// Sorted roster snapshot with a navigation pointer.
#[derive(Debug, Clone)]
pub struct Roster {
    active: Vec<Holder>,
    inactive: Vec<Holder>,
    nearest: Option<usize>,
    current: Option<usize>,
}

impl Roster {
    /// Builds the roster for `now` and points it at the nearest lesson.
    ///
    /// Falls back to the first active holder when nothing is scheduled.
    pub fn build(holders: &[Holder], now: NaiveDateTime) -> Self {
        let (archived, active): (Vec<Holder>, Vec<Holder>) = holders
            .iter()
            .cloned()
            .partition(|holder| holder.is_archived());

        let active = sort_by_lesson_time(&active, now);
        let mut inactive = archived;
        inactive.sort_by_cached_key(NameKey::of);

        let nearest = compute_nearest_index(&active, now);
        let current = nearest.or(if active.is_empty() { None } else { Some(0) });

        Self {
            active,
            inactive,
            nearest,
            current,
        }
    }

    pub fn active(&self) -> &[Holder] {
        &self.active
    }

    /// Archived holders ordered by name.
    pub fn inactive(&self) -> &[Holder] {
        &self.inactive
    }

    /// `s-<id>` / `g-<id>` keys in roster order.
    pub fn type_ids(&self) -> Vec<String> {
        self.active
            .iter()
            .map(|holder| holder.holder_ref().type_id())
            .collect()
    }

    pub fn nearest_index(&self) -> Option<usize> {
        self.nearest
    }

    pub fn nearest_holder(&self) -> Option<&Holder> {
        self.nearest.and_then(|index| self.active.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_holder(&self) -> Option<&Holder> {
        self.current.and_then(|index| self.active.get(index))
    }

    /// Advances to the next holder, wrapping to the first.
    pub fn next(&mut self) -> Option<&Holder> {
        self.current = self
            .current
            .and_then(|index| next_index(index, self.active.len()));
        self.current_holder()
    }

    /// Steps back to the previous holder, wrapping to the last.
    pub fn previous(&mut self) -> Option<&Holder> {
        self.current = self
            .current
            .and_then(|index| previous_index(index, self.active.len()));
        self.current_holder()
    }

    /// Points at the holder with the given type-id. Returns `false` and
    /// leaves the pointer untouched when it is not on the active roster.
    pub fn select(&mut self, type_id: &str) -> bool {
        match self
            .active
            .iter()
            .position(|holder| holder.holder_ref().type_id() == type_id)
        {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn reset_to_nearest(&mut self) {
        if self.nearest.is_some() {
            self.current = self.nearest;
        }
    }
}
