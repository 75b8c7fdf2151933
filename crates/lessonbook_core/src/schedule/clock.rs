//! Weekday and time-of-day arithmetic.

use crate::model::holder::{LessonTime, Weekday};
use crate::model::validation::ValidationError;
use chrono::{Datelike, NaiveDateTime, Timelike};

pub const MINUTES_PER_DAY: i64 = 24 * 60;
pub const DAYS_PER_WEEK: u8 = 7;
pub const MINUTES_PER_WEEK: i64 = DAYS_PER_WEEK as i64 * MINUTES_PER_DAY;

/// Days from `now` (0 = today) until the next occurrence of `weekday`.
///
/// Always in `[0, 6]`.
pub fn weekday_rank(weekday: Weekday, now: NaiveDateTime) -> u8 {
    let today = Weekday::from_chrono(now.weekday()).days_from_monday();
    (weekday.days_from_monday() + DAYS_PER_WEEK - today) % DAYS_PER_WEEK
}

/// Parses `HH:MM` into minutes since midnight.
///
/// # Errors
/// - Returns `ValidationError::InvalidTime` for anything but a 24-hour
///   `HH:MM` value.
pub fn minutes_of_day(time: &str) -> Result<u16, ValidationError> {
    time.parse::<LessonTime>().map(LessonTime::minutes)
}

/// Minute of day of `now`, seconds truncated.
pub fn minute_of(now: NaiveDateTime) -> u16 {
    // hour < 24 and minute < 60, so this always fits.
    (now.hour() * 60 + now.minute()) as u16
}

#[cfg(test)]
mod tests {
    use super::{minute_of, minutes_of_day, weekday_rank};
    use crate::model::holder::Weekday;
    use chrono::NaiveDate;

    #[test]
    fn rank_counts_days_until_next_occurrence() {
        // 2024-05-15 is a Wednesday.
        let now = NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(weekday_rank(Weekday::Wednesday, now), 0);
        assert_eq!(weekday_rank(Weekday::Thursday, now), 1);
        assert_eq!(weekday_rank(Weekday::Sunday, now), 4);
        assert_eq!(weekday_rank(Weekday::Monday, now), 5);
        assert_eq!(weekday_rank(Weekday::Tuesday, now), 6);
    }

    #[test]
    fn minutes_of_day_parses_bounds() {
        assert_eq!(minutes_of_day("00:00").unwrap(), 0);
        assert_eq!(minutes_of_day("14:30").unwrap(), 870);
        assert!(minutes_of_day("14h30").is_err());
    }

    #[test]
    fn minute_of_ignores_seconds() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(13, 45, 59)
            .unwrap();
        assert_eq!(minute_of(now), 825);
    }
}
