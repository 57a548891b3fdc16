use chrono::NaiveDate;
use shared::error::AppResult;
use shared::models::{ServiceType, SpecialDay, WeeklySchedule};

use super::{ScheduleSource, filter_special_days, filter_weekly};

/// Fixed in-memory schedules (tests, embedded callers)
#[derive(Debug, Clone, Default)]
pub struct StaticSchedules {
    pub weekly: Vec<WeeklySchedule>,
    pub special_days: Vec<SpecialDay>,
}

impl StaticSchedules {
    pub fn new(weekly: Vec<WeeklySchedule>, special_days: Vec<SpecialDay>) -> Self {
        Self {
            weekly,
            special_days,
        }
    }
}

impl ScheduleSource for StaticSchedules {
    fn weekly_schedules(&self, service: Option<ServiceType>) -> AppResult<Vec<WeeklySchedule>> {
        Ok(filter_weekly(self.weekly.iter().cloned(), service))
    }

    fn special_days_from(&self, from: NaiveDate) -> AppResult<Vec<SpecialDay>> {
        Ok(filter_special_days(self.special_days.iter().cloned(), from))
    }
}
