//! Schedule data access
//!
//! The resolver only ever sees validated slices; a [`ScheduleSource`] is
//! how callers fetch them fresh for each evaluation.

mod json;
mod memory;

pub use json::{JsonScheduleStore, StoreHoursDocument};
pub use memory::StaticSchedules;

use chrono::{NaiveDate, NaiveDateTime};
use shared::error::AppResult;
use shared::models::{ServiceType, SpecialDay, StoreStatus, WeeklySchedule};

use crate::hours::resolve_status;

/// Read access to a store's schedules
pub trait ScheduleSource {
    /// Weekly rows, optionally narrowed to rows that apply to `service`
    /// (rows tagged `service` plus rows tagged `all`)
    fn weekly_schedules(&self, service: Option<ServiceType>) -> AppResult<Vec<WeeklySchedule>>;

    /// Special days dated `from` or later
    fn special_days_from(&self, from: NaiveDate) -> AppResult<Vec<SpecialDay>>;
}

/// Fetch fresh schedule data and resolve the status at `now`
pub fn status_from_source<S: ScheduleSource + ?Sized>(
    source: &S,
    now: NaiveDateTime,
    service: ServiceType,
) -> AppResult<StoreStatus> {
    let weekly = source.weekly_schedules(Some(service))?;
    let specials = source.special_days_from(now.date())?;
    Ok(resolve_status(&weekly, &specials, now, service))
}

pub(crate) fn filter_weekly(
    schedules: impl IntoIterator<Item = WeeklySchedule>,
    service: Option<ServiceType>,
) -> Vec<WeeklySchedule> {
    schedules
        .into_iter()
        .filter(|s| service.is_none_or(|requested| s.service_type.applies_to(requested)))
        .collect()
}

pub(crate) fn filter_special_days(
    days: impl IntoIterator<Item = SpecialDay>,
    from: NaiveDate,
) -> Vec<SpecialDay> {
    days.into_iter().filter(|d| d.date >= from).collect()
}
