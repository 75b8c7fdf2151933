//! Holder model: students and group classes that own a weekly lesson slot.
//!
//! # Responsibility
//! - Define the closed weekday and `HH:MM` time vocabularies.
//! - Represent a holder as an explicit tagged variant (`student` | `group`).
//!
//! # Invariants
//! - A start/end time is only valid together with a weekday.
//! - A weekday is only valid together with a start time.
//! - `end_time`, when set, is not earlier than `start_time`.
//! - Weekdays serialize with the German labels stored by the application.

use crate::model::validation::ValidationError;
use crate::model::{require_id, require_text, Entity, EntityId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static LESSON_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid lesson time regex"));

/// One of the seven lesson days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Monday-first week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Stored label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Monday => "Montag",
            Self::Tuesday => "Dienstag",
            Self::Wednesday => "Mittwoch",
            Self::Thursday => "Donnerstag",
            Self::Friday => "Freitag",
            Self::Saturday => "Samstag",
            Self::Sunday => "Sonntag",
        }
    }

    pub fn days_from_monday(self) -> u8 {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts stored labels and English names, case-insensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "montag" | "monday" => Ok(Self::Monday),
            "dienstag" | "tuesday" => Ok(Self::Tuesday),
            "mittwoch" | "wednesday" => Ok(Self::Wednesday),
            "donnerstag" | "thursday" => Ok(Self::Thursday),
            "freitag" | "friday" => Ok(Self::Friday),
            "samstag" | "saturday" => Ok(Self::Saturday),
            "sonntag" | "sunday" => Ok(Self::Sunday),
            _ => Err(ValidationError::InvalidWeekday(value.to_string())),
        }
    }
}

impl TryFrom<String> for Weekday {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weekday> for String {
    fn from(value: Weekday) -> Self {
        value.label().to_string()
    }
}

/// Time of day with minute precision, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LessonTime(u16);

impl LessonTime {
    /// Builds a time from hour and minute components.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Compile-time constructor for known-good literals.
    pub(crate) const fn hm(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    /// Minutes since midnight, always in `[0, 1439]`.
    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl Display for LessonTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for LessonTime {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let caps = LESSON_TIME_RE
            .captures(value)
            .ok_or_else(|| ValidationError::InvalidTime(value.to_string()))?;
        let hour = caps[1]
            .parse::<u16>()
            .map_err(|_| ValidationError::InvalidTime(value.to_string()))?;
        let minute = caps[2]
            .parse::<u16>()
            .map_err(|_| ValidationError::InvalidTime(value.to_string()))?;
        Self::from_hm(hour, minute)
    }
}

impl TryFrom<String> for LessonTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LessonTime> for String {
    fn from(value: LessonTime) -> Self {
        value.to_string()
    }
}

/// Weekly lesson slot of a holder. All fields empty means unscheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSchedule {
    pub weekday: Option<Weekday>,
    pub start_time: Option<LessonTime>,
    pub end_time: Option<LessonTime>,
    pub duration_minutes: Option<u16>,
    pub location: Option<String>,
}

impl LessonSchedule {
    /// Slot on `weekday` starting at `start_time`.
    pub fn weekly(weekday: Weekday, start_time: LessonTime) -> Self {
        Self {
            weekday: Some(weekday),
            start_time: Some(start_time),
            ..Self::default()
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.weekday.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weekday.is_none() && (self.start_time.is_some() || self.end_time.is_some()) {
            return Err(ValidationError::TimeWithoutWeekday);
        }
        if self.weekday.is_some() && self.start_time.is_none() {
            return Err(ValidationError::WeekdayWithoutStartTime);
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(ValidationError::EndBeforeStart {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        if self.duration_minutes == Some(0) {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(())
    }
}

/// Individually taught student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub owner_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub instrument: String,
    #[serde(default)]
    pub schedule: LessonSchedule,
    #[serde(default)]
    pub archived: bool,
}

/// Create payload for [`Student`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDraft {
    pub owner_id: String,
    pub first_name: String,
    pub last_name: String,
    pub instrument: String,
    pub schedule: LessonSchedule,
    pub archived: bool,
}

impl Entity for Student {
    type Draft = StudentDraft;
    const COLLECTION: &'static str = "students";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: EntityId, draft: &StudentDraft) -> Self {
        Self {
            id,
            owner_id: draft.owner_id.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            instrument: draft.instrument.clone(),
            schedule: draft.schedule.clone(),
            archived: draft.archived,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.id)?;
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        self.schedule.validate()
    }
}

/// Group class taught together in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: EntityId,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub schedule: LessonSchedule,
    #[serde(default)]
    pub archived: bool,
}

/// Create payload for [`Group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDraft {
    pub owner_id: String,
    pub name: String,
    pub schedule: LessonSchedule,
    pub archived: bool,
}

impl Entity for Group {
    type Draft = GroupDraft;
    const COLLECTION: &'static str = "groups";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: EntityId, draft: &GroupDraft) -> Self {
        Self {
            id,
            owner_id: draft.owner_id.clone(),
            name: draft.name.clone(),
            schedule: draft.schedule.clone(),
            archived: draft.archived,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.id)?;
        require_text("name", &self.name)?;
        self.schedule.validate()
    }
}

/// Discriminant of a [`Holder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderKind {
    Student,
    Group,
}

impl HolderKind {
    /// Prefix used in holder type-ids (`s-<id>`, `g-<id>`).
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Student => "s",
            Self::Group => "g",
        }
    }
}

/// Reference from a dependent record to its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HolderRef {
    pub kind: HolderKind,
    pub id: EntityId,
}

impl HolderRef {
    pub fn student(id: EntityId) -> Self {
        Self {
            kind: HolderKind::Student,
            id,
        }
    }

    pub fn group(id: EntityId) -> Self {
        Self {
            kind: HolderKind::Group,
            id,
        }
    }

    /// Stable roster key, e.g. `s-<uuid>`.
    pub fn type_id(&self) -> String {
        format!("{}-{}", self.kind.prefix(), self.id)
    }
}

/// Schedulable teaching unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Holder {
    Student(Student),
    Group(Group),
}

impl Holder {
    pub fn id(&self) -> EntityId {
        match self {
            Self::Student(student) => student.id,
            Self::Group(group) => group.id,
        }
    }

    pub fn kind(&self) -> HolderKind {
        match self {
            Self::Student(_) => HolderKind::Student,
            Self::Group(_) => HolderKind::Group,
        }
    }

    pub fn holder_ref(&self) -> HolderRef {
        HolderRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    pub fn schedule(&self) -> &LessonSchedule {
        match self {
            Self::Student(student) => &student.schedule,
            Self::Group(group) => &group.schedule,
        }
    }

    pub fn is_archived(&self) -> bool {
        match self {
            Self::Student(student) => student.archived,
            Self::Group(group) => group.archived,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule().is_scheduled()
    }

    /// Human-readable name: `First Last` or the group name.
    pub fn display_name(&self) -> String {
        match self {
            Self::Student(student) => format!("{} {}", student.first_name, student.last_name),
            Self::Group(group) => group.name.clone(),
        }
    }

    /// Instrument of a student; groups have none.
    pub fn instrument(&self) -> Option<&str> {
        match self {
            Self::Student(student) => Some(student.instrument.as_str()),
            Self::Group(_) => None,
        }
    }

    /// Primary and secondary sort names (last/first, or group name).
    pub fn sort_names(&self) -> (&str, &str) {
        match self {
            Self::Student(student) => (student.last_name.as_str(), student.first_name.as_str()),
            Self::Group(group) => (group.name.as_str(), ""),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Student(student) => student.validate(),
            Self::Group(group) => group.validate(),
        }
    }
}

impl From<Student> for Holder {
    fn from(value: Student) -> Self {
        Self::Student(value)
    }
}

impl From<Group> for Holder {
    fn from(value: Group) -> Self {
        Self::Group(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{LessonSchedule, LessonTime, Weekday};
    use crate::model::validation::ValidationError;

    #[test]
    fn lesson_time_parses_and_formats_24h() {
        let time: LessonTime = "09:05".parse().expect("valid time");
        assert_eq!(time.minutes(), 545);
        assert_eq!(time.to_string(), "09:05");
        assert_eq!("23:59".parse::<LessonTime>().unwrap().minutes(), 1439);
    }

    #[test]
    fn lesson_time_rejects_malformed_values() {
        for raw in ["24:00", "9:30", "12:60", "noon", "", "12:30:00"] {
            let err = raw.parse::<LessonTime>().expect_err("malformed time must fail");
            assert_eq!(err, ValidationError::InvalidTime(raw.to_string()));
        }
    }

    #[test]
    fn weekday_parses_labels_case_insensitive() {
        assert_eq!("montag".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!(" Friday ".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn schedule_rejects_time_without_weekday() {
        let schedule = LessonSchedule {
            start_time: Some(LessonTime::from_hm(10, 0).unwrap()),
            ..LessonSchedule::default()
        };
        assert_eq!(schedule.validate(), Err(ValidationError::TimeWithoutWeekday));
    }

    #[test]
    fn schedule_rejects_reversed_slot() {
        let mut schedule =
            LessonSchedule::weekly(Weekday::Tuesday, LessonTime::from_hm(15, 0).unwrap());
        schedule.end_time = Some(LessonTime::from_hm(14, 30).unwrap());
        assert!(matches!(
            schedule.validate(),
            Err(ValidationError::EndBeforeStart { .. })
        ));
    }
}
