//! Next-open search
//!
//! Scans forward day by day from tomorrow. A special day on a candidate date
//! decides that date on its own, open or closed.

use chrono::{Days, NaiveDate, NaiveTime};
use shared::models::{NextOpening, ServiceType, SpecialDay, WeeklySchedule};

use super::format::{format_time, weekday_index, weekday_name};
use super::lookup::{special_for_date, weekly_for_day};

/// Look-ahead horizon in days
pub const LOOKAHEAD_DAYS: u32 = 14;

/// First opening strictly after `today`, at most [`LOOKAHEAD_DAYS`] ahead
pub fn find_next_opening(
    weekly: &[WeeklySchedule],
    specials: &[SpecialDay],
    today: NaiveDate,
    service: ServiceType,
) -> Option<NextOpening> {
    (1..=LOOKAHEAD_DAYS).find_map(|offset| {
        let date = today.checked_add_days(Days::new(u64::from(offset)))?;

        if let Some(special) = special_for_date(specials, date, service) {
            let window = special.hours.window()?;
            return Some(opening(date, window.open(), offset, Some(special.label.as_str())));
        }

        let row = weekly_for_day(weekly, weekday_index(date), service)?;
        let window = row.hours.window()?;
        Some(opening(date, window.open(), offset, None))
    })
}

/// Opening later today (before-open and pause cases)
pub fn opening_today(today: NaiveDate, at: NaiveTime, label: Option<&str>) -> NextOpening {
    opening(today, at, 0, label)
}

fn opening(date: NaiveDate, at: NaiveTime, days_ahead: u32, label: Option<&str>) -> NextOpening {
    NextOpening {
        date,
        open_time: format_time(at),
        days_ahead,
        label: label.map(str::to_string),
    }
}

/// Human-readable hint
///
/// "Opens today at 11:00", "Opens tomorrow at 11:00", "Opens Wednesday at 11:00",
/// and from a week out "Opens Monday 26 Oct at 11:00" so the weekday is unambiguous.
pub fn describe(next: &NextOpening) -> String {
    let index = weekday_index(next.date);
    let when = match next.days_ahead {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        2..=6 => weekday_name(index).unwrap_or_default().to_string(),
        _ => format!(
            "{} {}",
            weekday_name(index).unwrap_or_default(),
            next.date.format("%d %b")
        ),
    };
    match &next.label {
        Some(label) => format!("Opens {} at {} ({})", when, next.open_time, label),
        None => format!("Opens {} at {}", when, next.open_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DayHours, OpeningWindow};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn open_day(day: u8, open: NaiveTime) -> WeeklySchedule {
        let window = OpeningWindow::new(open, t(22, 0), None).unwrap();
        WeeklySchedule::new(day, ServiceType::All, DayHours::Open(window)).unwrap()
    }

    #[test]
    fn test_skips_today_and_finds_tomorrow() {
        // 2026-10-19 is Monday
        let weekly = vec![open_day(1, t(11, 0)), open_day(2, t(12, 0))];
        let next = find_next_opening(&weekly, &[], date(19), ServiceType::All).unwrap();
        assert_eq!(next.date, date(20));
        assert_eq!(next.days_ahead, 1);
        assert_eq!(next.open_time, "12:00");
        assert_eq!(describe(&next), "Opens tomorrow at 12:00");
    }

    #[test]
    fn test_closed_special_blocks_regular_day() {
        let weekly = vec![open_day(2, t(11, 0)), open_day(3, t(11, 0))];
        let specials =
            vec![SpecialDay::new(date(20), "Staff day", ServiceType::All, DayHours::Closed).unwrap()];
        let next = find_next_opening(&weekly, &specials, date(19), ServiceType::All).unwrap();
        assert_eq!(next.date, date(21));
        assert_eq!(describe(&next), "Opens Wednesday at 11:00");
    }

    #[test]
    fn test_open_special_wins_and_carries_label() {
        let window = OpeningWindow::new(t(18, 0), t(23, 0), None).unwrap();
        let specials = vec![
            SpecialDay::new(date(22), "Wine night", ServiceType::All, DayHours::Open(window))
                .unwrap(),
        ];
        let next = find_next_opening(&[], &specials, date(19), ServiceType::All).unwrap();
        assert_eq!(next.label.as_deref(), Some("Wine night"));
        assert_eq!(describe(&next), "Opens Thursday at 18:00 (Wine night)");
    }

    #[test]
    fn test_far_hint_uses_date() {
        // only Monday open, searched from a Monday: next is 7 days later
        let weekly = vec![open_day(1, t(11, 0))];
        let next = find_next_opening(&weekly, &[], date(19), ServiceType::All).unwrap();
        assert_eq!(next.days_ahead, 7);
        assert_eq!(describe(&next), "Opens Monday 26 Oct at 11:00");
    }

    #[test]
    fn test_specific_row_beats_all_in_lookahead() {
        // Tuesday: open for everyone, closed for delivery
        let weekly = vec![
            open_day(2, t(11, 0)),
            WeeklySchedule::closed(2, ServiceType::Delivery).unwrap(),
            open_day(3, t(12, 0)),
        ];
        let next = find_next_opening(&weekly, &[], date(19), ServiceType::Delivery).unwrap();
        assert_eq!(next.date, date(21));
        assert_eq!(next.days_ahead, 2);
        assert_eq!(next.open_time, "12:00");

        let pickup = find_next_opening(&weekly, &[], date(19), ServiceType::Pickup).unwrap();
        assert_eq!(pickup.date, date(20));
    }

    #[test]
    fn test_horizon_is_bounded() {
        let window = OpeningWindow::new(t(11, 0), t(22, 0), None).unwrap();
        let day_15 = date(19).checked_add_days(Days::new(15)).unwrap();
        let day_14 = date(19).checked_add_days(Days::new(14)).unwrap();
        let beyond =
            vec![SpecialDay::new(day_15, "Reopening", ServiceType::All, DayHours::Open(window)).unwrap()];
        assert!(find_next_opening(&[], &beyond, date(19), ServiceType::All).is_none());

        let edge =
            vec![SpecialDay::new(day_14, "Reopening", ServiceType::All, DayHours::Open(window)).unwrap()];
        let next = find_next_opening(&[], &edge, date(19), ServiceType::All).unwrap();
        assert_eq!(next.days_ahead, LOOKAHEAD_DAYS);
    }

    #[test]
    fn test_describe_today() {
        let next = opening_today(date(19), t(18, 0), None);
        assert_eq!(describe(&next), "Opens today at 18:00");
    }
}
