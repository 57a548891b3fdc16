//! Store Hours Models
//!
//! Two shapes per record:
//! - `*Row`: flat storage/API shape with optional time strings (`HH:MM[:SS]`)
//! - validated type: an open day always carries a well-formed [`OpeningWindow`]
//!
//! `TryFrom<&Row>` is the strict write-path conversion. `from_row_lenient`
//! is the read-path conversion: a malformed row resolves to closed.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Fulfillment channel a schedule or a status query applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    #[default]
    All,
    Delivery,
    Pickup,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }

    /// Whether a row tagged with `self` applies to a query for `requested`
    ///
    /// `all` rows apply to every query; a specific row only to its own channel.
    pub fn applies_to(&self, requested: ServiceType) -> bool {
        *self == requested || *self == ServiceType::All
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(AppError::invalid_format("service_type", s)),
        }
    }
}

/// Parse a wall-clock time (`HH:MM:SS` or `HH:MM`)
pub fn parse_time(field: &str, value: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::invalid_format(field, value))
}

/// Storage format for times (matches SQL `TIME`)
fn time_to_string(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Temporary closure inside an open day, half-open `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl PauseWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::new(ErrorCode::SchedulePauseInvalid)
                .with_detail("pause_start", time_to_string(start))
                .with_detail("pause_end", time_to_string(end)));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// `pause_end` itself already counts as open again
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Opening hours of one day, closed interval `[open, close]`
///
/// Windows crossing midnight are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    open: NaiveTime,
    close: NaiveTime,
    pause: Option<PauseWindow>,
}

impl OpeningWindow {
    pub fn new(open: NaiveTime, close: NaiveTime, pause: Option<PauseWindow>) -> AppResult<Self> {
        if open == close {
            return Err(AppError::new(ErrorCode::ScheduleEmptyWindow)
                .with_detail("open_time", time_to_string(open)));
        }
        if open > close {
            return Err(AppError::new(ErrorCode::ScheduleOvernightWindow)
                .with_detail("open_time", time_to_string(open))
                .with_detail("close_time", time_to_string(close)));
        }
        if let Some(p) = pause
            && (p.start < open || p.end > close)
        {
            return Err(AppError::new(ErrorCode::SchedulePauseOutsideWindow)
                .with_detail("pause_start", time_to_string(p.start))
                .with_detail("pause_end", time_to_string(p.end)));
        }
        Ok(Self { open, close, pause })
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    pub fn pause(&self) -> Option<&PauseWindow> {
        self.pause.as_ref()
    }

    /// Both ends inclusive
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.open && time <= self.close
    }
}

/// Hours in effect for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    Open(OpeningWindow),
}

impl DayHours {
    /// Build from the flat optional-field shape shared by both row types
    pub fn from_parts(
        is_open: bool,
        open_time: Option<&str>,
        close_time: Option<&str>,
        pause_start: Option<&str>,
        pause_end: Option<&str>,
    ) -> AppResult<Self> {
        if !is_open {
            return Ok(Self::Closed);
        }

        let (Some(open), Some(close)) = (open_time, close_time) else {
            return Err(AppError::new(ErrorCode::ScheduleMissingTimes));
        };
        let open = parse_time("open_time", open)?;
        let close = parse_time("close_time", close)?;

        let pause = match (pause_start, pause_end) {
            (Some(start), Some(end)) => Some(PauseWindow::new(
                parse_time("pause_start", start)?,
                parse_time("pause_end", end)?,
            )?),
            (None, None) => None,
            _ => {
                return Err(AppError::with_message(
                    ErrorCode::SchedulePauseInvalid,
                    "Pause start and pause end must be set together",
                ));
            }
        };

        Ok(Self::Open(OpeningWindow::new(open, close, pause)?))
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn window(&self) -> Option<&OpeningWindow> {
        match self {
            Self::Open(window) => Some(window),
            Self::Closed => None,
        }
    }

    /// Flatten back into (is_open, open, close, pause_start, pause_end)
    fn to_parts(
        self,
    ) -> (
        bool,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    ) {
        match self {
            Self::Closed => (false, None, None, None, None),
            Self::Open(w) => (
                true,
                Some(time_to_string(w.open)),
                Some(time_to_string(w.close)),
                w.pause.map(|p| time_to_string(p.start)),
                w.pause.map(|p| time_to_string(p.end)),
            ),
        }
    }
}

// ==================== Weekly schedule ====================

/// Weekly schedule row (one per day of week × service type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyScheduleRow {
    /// 0=Sunday..6=Saturday
    pub day_of_week: u8,
    pub is_open: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub pause_start: Option<String>,
    pub pause_end: Option<String>,
    #[serde(default)]
    pub service_type: ServiceType,
}

/// Validated weekly schedule entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    /// 0=Sunday..6=Saturday
    pub day_of_week: u8,
    pub service_type: ServiceType,
    pub hours: DayHours,
}

impl WeeklySchedule {
    pub fn new(day_of_week: u8, service_type: ServiceType, hours: DayHours) -> AppResult<Self> {
        if day_of_week > 6 {
            return Err(AppError::new(ErrorCode::ScheduleInvalidDay)
                .with_detail("day_of_week", day_of_week));
        }
        Ok(Self {
            day_of_week,
            service_type,
            hours,
        })
    }

    pub fn closed(day_of_week: u8, service_type: ServiceType) -> AppResult<Self> {
        Self::new(day_of_week, service_type, DayHours::Closed)
    }

    /// Read-path conversion
    ///
    /// Rows with broken hours resolve to closed. A row whose day cannot be
    /// placed on the week is dropped.
    pub fn from_row_lenient(row: &WeeklyScheduleRow) -> Option<Self> {
        if row.day_of_week > 6 {
            tracing::warn!(
                day_of_week = row.day_of_week,
                service_type = %row.service_type,
                "Dropping weekly schedule row with invalid day"
            );
            return None;
        }
        let hours = row_hours(row).unwrap_or_else(|e| {
            tracing::warn!(
                day_of_week = row.day_of_week,
                service_type = %row.service_type,
                error = %e,
                "Malformed weekly schedule row, treating day as closed"
            );
            DayHours::Closed
        });
        Some(Self {
            day_of_week: row.day_of_week,
            service_type: row.service_type,
            hours,
        })
    }

    pub fn to_row(&self) -> WeeklyScheduleRow {
        let (is_open, open_time, close_time, pause_start, pause_end) = self.hours.to_parts();
        WeeklyScheduleRow {
            day_of_week: self.day_of_week,
            is_open,
            open_time,
            close_time,
            pause_start,
            pause_end,
            service_type: self.service_type,
        }
    }
}

fn row_hours(row: &WeeklyScheduleRow) -> AppResult<DayHours> {
    DayHours::from_parts(
        row.is_open,
        row.open_time.as_deref(),
        row.close_time.as_deref(),
        row.pause_start.as_deref(),
        row.pause_end.as_deref(),
    )
}

impl TryFrom<&WeeklyScheduleRow> for WeeklySchedule {
    type Error = AppError;

    fn try_from(row: &WeeklyScheduleRow) -> Result<Self, Self::Error> {
        let hours = row_hours(row).map_err(|e| e.with_detail("day_of_week", row.day_of_week))?;
        Self::new(row.day_of_week, row.service_type, hours)
    }
}

// ==================== Special day ====================

/// Special day row (holiday / event), keyed by calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDayRow {
    pub date: NaiveDate,
    pub label: String,
    pub is_open: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub pause_start: Option<String>,
    pub pause_end: Option<String>,
    #[serde(default)]
    pub service_type: ServiceType,
}

/// Validated special day override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDay {
    pub date: NaiveDate,
    pub label: String,
    pub service_type: ServiceType,
    pub hours: DayHours,
}

impl SpecialDay {
    pub fn new(
        date: NaiveDate,
        label: impl Into<String>,
        service_type: ServiceType,
        hours: DayHours,
    ) -> AppResult<Self> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(AppError::new(ErrorCode::SpecialDayLabelRequired)
                .with_detail("date", date.to_string()));
        }
        Ok(Self {
            date,
            label,
            service_type,
            hours,
        })
    }

    /// Read-path conversion, broken hours resolve to closed
    pub fn from_row_lenient(row: &SpecialDayRow) -> Self {
        let hours = special_hours(row).unwrap_or_else(|e| {
            tracing::warn!(
                date = %row.date,
                label = %row.label,
                error = %e,
                "Malformed special day row, treating date as closed"
            );
            DayHours::Closed
        });
        Self {
            date: row.date,
            label: row.label.clone(),
            service_type: row.service_type,
            hours,
        }
    }

    pub fn to_row(&self) -> SpecialDayRow {
        let (is_open, open_time, close_time, pause_start, pause_end) = self.hours.to_parts();
        SpecialDayRow {
            date: self.date,
            label: self.label.clone(),
            is_open,
            open_time,
            close_time,
            pause_start,
            pause_end,
            service_type: self.service_type,
        }
    }
}

fn special_hours(row: &SpecialDayRow) -> AppResult<DayHours> {
    DayHours::from_parts(
        row.is_open,
        row.open_time.as_deref(),
        row.close_time.as_deref(),
        row.pause_start.as_deref(),
        row.pause_end.as_deref(),
    )
}

impl TryFrom<&SpecialDayRow> for SpecialDay {
    type Error = AppError;

    fn try_from(row: &SpecialDayRow) -> Result<Self, Self::Error> {
        let hours = special_hours(row).map_err(|e| e.with_detail("date", row.date.to_string()))?;
        Self::new(row.date, row.label.as_str(), row.service_type, hours)
    }
}
