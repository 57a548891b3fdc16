//! Row selection
//!
//! A row tagged with the requested service type beats an `all` row for the
//! same day or date.

use chrono::NaiveDate;
use shared::models::{ServiceType, SpecialDay, WeeklySchedule};

/// Weekly row for a day of week (0=Sunday)
pub fn weekly_for_day(
    weekly: &[WeeklySchedule],
    day_of_week: u8,
    service: ServiceType,
) -> Option<&WeeklySchedule> {
    pick(weekly, service, |s| s.day_of_week == day_of_week, |s| s.service_type)
}

/// Special day for a calendar date
pub fn special_for_date(
    specials: &[SpecialDay],
    date: NaiveDate,
    service: ServiceType,
) -> Option<&SpecialDay> {
    pick(specials, service, |s| s.date == date, |s| s.service_type)
}

fn pick<T>(
    rows: &[T],
    service: ServiceType,
    matches_key: impl Fn(&T) -> bool,
    service_of: impl Fn(&T) -> ServiceType,
) -> Option<&T> {
    rows.iter()
        .find(|r| matches_key(*r) && service_of(*r) == service)
        .or_else(|| {
            rows.iter()
                .find(|r| matches_key(*r) && service_of(*r) == ServiceType::All)
        })
}
