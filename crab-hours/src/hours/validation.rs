//! Write-path validation
//!
//! Runs before schedules are persisted and rejects invalid input outright.
//! The resolver never calls into this module.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    ServiceType, SpecialDay, SpecialDayRow, WeeklySchedule, WeeklyScheduleRow, parse_time,
};

/// Pause ordering check
///
/// A pause whose start is later than its end is only accepted when the
/// enclosing open window itself spans midnight. Equal start and end are
/// always rejected.
pub fn validate_pause(
    open: NaiveTime,
    close: NaiveTime,
    pause_start: NaiveTime,
    pause_end: NaiveTime,
) -> AppResult<()> {
    let spans_midnight = close < open;
    if pause_start == pause_end || (pause_start > pause_end && !spans_midnight) {
        return Err(AppError::new(ErrorCode::SchedulePauseInvalid)
            .with_detail("pause_start", pause_start.format("%H:%M").to_string())
            .with_detail("pause_end", pause_end.format("%H:%M").to_string()));
    }
    Ok(())
}

/// At most one row per (day, service type)
pub fn validate_weekly(schedules: &[WeeklySchedule]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for s in schedules {
        if s.day_of_week > 6 {
            return Err(AppError::new(ErrorCode::ScheduleInvalidDay)
                .with_detail("day_of_week", s.day_of_week));
        }
        if !seen.insert((s.day_of_week, s.service_type)) {
            return Err(AppError::new(ErrorCode::ScheduleDuplicateDay)
                .with_detail("day_of_week", s.day_of_week)
                .with_detail("service_type", s.service_type.as_str()));
        }
    }
    Ok(())
}

/// At most one special day per (date, service type), labels required
pub fn validate_special_days(days: &[SpecialDay]) -> AppResult<()> {
    let mut seen: HashSet<(NaiveDate, ServiceType)> = HashSet::new();
    for day in days {
        if day.label.trim().is_empty() {
            return Err(AppError::new(ErrorCode::SpecialDayLabelRequired)
                .with_detail("date", day.date.to_string()));
        }
        if !seen.insert((day.date, day.service_type)) {
            return Err(AppError::new(ErrorCode::SpecialDayDuplicate)
                .with_detail("date", day.date.to_string())
                .with_detail("service_type", day.service_type.as_str()));
        }
    }
    Ok(())
}

/// Strict conversion of one weekly row
pub fn parse_weekly_row(row: &WeeklyScheduleRow) -> AppResult<WeeklySchedule> {
    check_row_pause(
        row.is_open,
        row.open_time.as_deref(),
        row.close_time.as_deref(),
        row.pause_start.as_deref(),
        row.pause_end.as_deref(),
    )
    .map_err(|e| e.with_detail("day_of_week", row.day_of_week))?;
    WeeklySchedule::try_from(row)
}

/// Strict conversion of one special day row
pub fn parse_special_row(row: &SpecialDayRow) -> AppResult<SpecialDay> {
    check_row_pause(
        row.is_open,
        row.open_time.as_deref(),
        row.close_time.as_deref(),
        row.pause_start.as_deref(),
        row.pause_end.as_deref(),
    )
    .map_err(|e| e.with_detail("date", row.date.to_string()))?;
    SpecialDay::try_from(row)
}

/// Strict conversion of a full week, duplicates rejected
pub fn parse_weekly_rows(rows: &[WeeklyScheduleRow]) -> AppResult<Vec<WeeklySchedule>> {
    let schedules = rows
        .iter()
        .map(parse_weekly_row)
        .collect::<AppResult<Vec<_>>>()?;
    validate_weekly(&schedules)?;
    Ok(schedules)
}

/// Strict conversion of a set of special days, duplicates rejected
pub fn parse_special_rows(rows: &[SpecialDayRow]) -> AppResult<Vec<SpecialDay>> {
    let days = rows
        .iter()
        .map(parse_special_row)
        .collect::<AppResult<Vec<_>>>()?;
    validate_special_days(&days)?;
    Ok(days)
}

/// Pause ordering is checked before the window itself so the error names
/// the pause, not the window
fn check_row_pause(
    is_open: bool,
    open: Option<&str>,
    close: Option<&str>,
    pause_start: Option<&str>,
    pause_end: Option<&str>,
) -> AppResult<()> {
    if !is_open {
        return Ok(());
    }
    if let (Some(open), Some(close), Some(start), Some(end)) = (open, close, pause_start, pause_end)
    {
        validate_pause(
            parse_time("open_time", open)?,
            parse_time("close_time", close)?,
            parse_time("pause_start", start)?,
            parse_time("pause_end", end)?,
        )?;
    }
    Ok(())
}
