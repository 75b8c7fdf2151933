//! User-selected list ordering for holder overviews.
//!
//! # Invariants
//! - Holders missing the sorted field go last in either direction.
//! - Ties fall back to the ascending name key, so output is deterministic.
//! - Sorting is stable and never mutates its input.

use crate::model::holder::Holder;
use crate::model::validation::ValidationError;
use crate::schedule::roster::{collation_key, NameKey};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Field a holder list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    FirstName,
    #[default]
    LastName,
    Instrument,
    #[serde(alias = "dayOfLesson")]
    Weekday,
    #[serde(alias = "durationMinutes")]
    Duration,
    Location,
}

impl SortMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Instrument => "instrument",
            Self::Weekday => "weekday",
            Self::Duration => "duration",
            Self::Location => "location",
        }
    }
}

impl FromStr for SortMethod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "instrument" => Ok(Self::Instrument),
            "weekday" | "dayOfLesson" => Ok(Self::Weekday),
            "duration" | "durationMinutes" => Ok(Self::Duration),
            "location" => Ok(Self::Location),
            other => Err(ValidationError::InvalidSortMethod(other.to_string())),
        }
    }
}

/// Sort field plus direction. Defaults to last name, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    pub method: SortMethod,
    pub ascending: bool,
}

impl Sorting {
    pub fn new(method: SortMethod, ascending: bool) -> Self {
        Self { method, ascending }
    }
}

impl Default for Sorting {
    fn default() -> Self {
        Self::new(SortMethod::LastName, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Name(NameKey),
    Text(String),
    Number(u32),
}

#[derive(Debug)]
struct ListKey {
    field: Option<Field>,
    name: NameKey,
}

impl ListKey {
    fn of(holder: &Holder, method: SortMethod) -> Self {
        let schedule = holder.schedule();
        let field = match method {
            SortMethod::LastName => Some(Field::Name(NameKey::of(holder))),
            SortMethod::FirstName => Some(Field::Name(first_name_key(holder))),
            SortMethod::Instrument => holder.instrument().and_then(text_field),
            SortMethod::Weekday => schedule.weekday.map(|weekday| {
                let start = schedule.start_time.map_or(0, |time| time.minutes());
                Field::Number(u32::from(weekday.days_from_monday()) * 1440 + u32::from(start))
            }),
            SortMethod::Duration => schedule
                .duration_minutes
                .map(|minutes| Field::Number(u32::from(minutes))),
            SortMethod::Location => schedule.location.as_deref().and_then(text_field),
        };
        Self {
            field,
            name: NameKey::of(holder),
        }
    }
}

fn text_field(value: &str) -> Option<Field> {
    let key = collation_key(value);
    (!key.is_empty()).then_some(Field::Text(key))
}

fn first_name_key(holder: &Holder) -> NameKey {
    match holder {
        Holder::Student(student) => NameKey::from_parts(&student.first_name, &student.last_name),
        Holder::Group(group) => NameKey::from_parts(&group.name, ""),
    }
}

fn compare(left: &ListKey, right: &ListKey, ascending: bool) -> Ordering {
    let field = match (&left.field, &right.field) {
        (Some(a), Some(b)) if ascending => a.cmp(b),
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    field.then_with(|| left.name.cmp(&right.name))
}

/// Returns `holders` ordered by `sorting`.
pub fn sort_holders(holders: &[Holder], sorting: Sorting) -> Vec<Holder> {
    let mut keyed: Vec<(ListKey, &Holder)> = holders
        .iter()
        .map(|holder| (ListKey::of(holder, sorting.method), holder))
        .collect();
    keyed.sort_by(|(left, _), (right, _)| compare(left, right, sorting.ascending));
    keyed.into_iter().map(|(_, holder)| holder.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::{SortMethod, Sorting};

    #[test]
    fn method_names_accept_list_query_values() {
        assert_eq!("dayOfLesson".parse::<SortMethod>().unwrap(), SortMethod::Weekday);
        assert_eq!("durationMinutes".parse::<SortMethod>().unwrap(), SortMethod::Duration);
        assert!("shoeSize".parse::<SortMethod>().is_err());
        assert_eq!(Sorting::default(), Sorting::new(SortMethod::LastName, true));
    }
}
