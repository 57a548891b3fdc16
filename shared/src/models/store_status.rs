//! Store Status Model
//!
//! Computed verdict of the hours resolver, never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why the store is open or closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusReason {
    /// Inside the hours of today's special day
    SpecialOpen,
    /// Today's special day closes the store
    SpecialClosed,
    /// Inside today's regular hours
    RegularOpen,
    /// No regular hours today
    RegularClosed,
    /// Inside a pause window
    Pause,
    /// Before opening or after closing
    OutsideHours,
}

impl StatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpecialOpen => "special_open",
            Self::SpecialClosed => "special_closed",
            Self::RegularOpen => "regular_open",
            Self::RegularClosed => "regular_closed",
            Self::Pause => "pause",
            Self::OutsideHours => "outside_hours",
        }
    }
}

/// Today's window formatted for display (`HH:MM`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayWindow {
    pub open: String,
    pub close: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_end: Option<String>,
}

/// Structured form of the next-open hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextOpening {
    pub date: NaiveDate,
    /// `HH:MM`
    pub open_time: String,
    /// 0 = later today
    pub days_ahead: u32,
    /// Label of the special day providing the opening, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Open/closed verdict with explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub is_open: bool,
    pub message: String,
    pub reason: StatusReason,
    /// Set iff a special day governed today's verdict
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_special_event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_window: Option<TodayWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_open_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_opening: Option<NextOpening>,
}

impl StoreStatus {
    /// Short badge text for headers ("Open" / "On break" / "Closed")
    pub fn badge(&self) -> &'static str {
        match (self.is_open, self.reason) {
            (true, _) => "Open",
            (false, StatusReason::Pause) => "On break",
            (false, _) => "Closed",
        }
    }
}
