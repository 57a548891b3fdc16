//! Display helpers: weekday names and time formatting

use chrono::{Datelike, NaiveDate, NaiveTime};

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Long weekday name, 0=Sunday..6=Saturday
pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(index)).copied()
}

/// Short weekday name, 0=Sunday..6=Saturday
pub fn weekday_short(index: u8) -> Option<&'static str> {
    WEEKDAY_SHORT.get(usize::from(index)).copied()
}

/// Day-of-week index of a date, 0=Sunday
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always < 7
    date.weekday().num_days_from_sunday() as u8
}

/// `HH:MM`, seconds dropped
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_tables() {
        assert_eq!(weekday_name(0), Some("Sunday"));
        assert_eq!(weekday_name(3), Some("Wednesday"));
        assert_eq!(weekday_short(6), Some("Sat"));
        assert_eq!(weekday_name(7), None);
        assert_eq!(weekday_short(200), None);
    }

    #[test]
    fn test_weekday_index_starts_on_sunday() {
        // 2026-10-18 is a Sunday
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()), 1);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 10, 24).unwrap()), 6);
    }

    #[test]
    fn test_format_time_truncates_seconds() {
        let time = NaiveTime::from_hms_opt(22, 0, 59).unwrap();
        assert_eq!(format_time(time), "22:00");
        let time = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_time(time), "09:05");
    }
}
