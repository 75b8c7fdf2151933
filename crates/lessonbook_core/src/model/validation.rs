//! Validation errors raised before any optimistic apply or backend call.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-level invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nil UUID is reserved and cannot identify a record.
    NilId,
    /// Required text field is blank after trim.
    BlankField(&'static str),
    /// Value is not one of the seven weekday labels.
    InvalidWeekday(String),
    /// Value is not a 24-hour `HH:MM` time.
    InvalidTime(String),
    /// A start or end time was given without a weekday.
    TimeWithoutWeekday,
    /// A weekday was given without a start time.
    WeekdayWithoutStartTime,
    /// Lesson ends before it starts.
    EndBeforeStart { start: String, end: String },
    /// Lesson duration must be positive when present.
    ZeroDuration,
    /// Date range end precedes its start.
    ReversedDateRange { start: NaiveDate, end: NaiveDate },
    /// List sort field is not recognized.
    InvalidSortMethod(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidWeekday(value) => write!(f, "invalid weekday `{value}`"),
            Self::InvalidTime(value) => {
                write!(f, "invalid time `{value}`; expected 24-hour HH:MM")
            }
            Self::TimeWithoutWeekday => write!(f, "lesson time requires a weekday"),
            Self::WeekdayWithoutStartTime => write!(f, "lesson weekday requires a start time"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "end_time ({end}) must be >= start_time ({start})")
            }
            Self::ZeroDuration => write!(f, "duration_minutes must be positive"),
            Self::ReversedDateRange { start, end } => {
                write!(f, "end_date ({end}) must be >= start_date ({start})")
            }
            Self::InvalidSortMethod(value) => write!(f, "unknown sort method `{value}`"),
        }
    }
}

impl Error for ValidationError {}
