//! Numeric error codes
//!
//! The leading digit groups codes (see [`ErrorCategory`](super::ErrorCategory)):
//! 0xxx input format, 1xxx weekly schedule, 2xxx special day, 9xxx system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code, serialized as its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unparseable time, date, time zone or service type
    InvalidFormat = 1,

    // ==================== 1xxx: Weekly schedule ====================
    /// Day of week outside 0..=6
    ScheduleInvalidDay = 1001,
    /// Open day without open/close times
    ScheduleMissingTimes = 1002,
    /// Open time equals close time
    ScheduleEmptyWindow = 1003,
    /// Close time earlier than open time (crosses midnight)
    ScheduleOvernightWindow = 1004,
    /// Pause start/end missing one side, equal, or reversed
    SchedulePauseInvalid = 1005,
    SchedulePauseOutsideWindow = 1006,
    /// Two rows for the same day and service type
    ScheduleDuplicateDay = 1007,

    // ==================== 2xxx: Special day ====================
    /// Two special days for the same date and service type
    SpecialDayDuplicate = 2001,
    SpecialDayLabelRequired = 2002,
    SpecialDayNotFound = 2003,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    /// Schedule file could not be read or written
    StorageError = 9002,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::InvalidFormat,
        ErrorCode::ScheduleInvalidDay,
        ErrorCode::ScheduleMissingTimes,
        ErrorCode::ScheduleEmptyWindow,
        ErrorCode::ScheduleOvernightWindow,
        ErrorCode::SchedulePauseInvalid,
        ErrorCode::SchedulePauseOutsideWindow,
        ErrorCode::ScheduleDuplicateDay,
        ErrorCode::SpecialDayDuplicate,
        ErrorCode::SpecialDayLabelRequired,
        ErrorCode::SpecialDayNotFound,
        ErrorCode::InternalError,
        ErrorCode::StorageError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message, used when no specific message is given
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFormat => "Invalid format",

            ErrorCode::ScheduleInvalidDay => "Day of week must be between 0 (Sunday) and 6",
            ErrorCode::ScheduleMissingTimes => "Open days require both open and close time",
            ErrorCode::ScheduleEmptyWindow => "Open time and close time must differ",
            ErrorCode::ScheduleOvernightWindow => "Close time must be later than open time",
            ErrorCode::SchedulePauseInvalid => "Pause start must be earlier than pause end",
            ErrorCode::SchedulePauseOutsideWindow => "Pause must lie within opening hours",
            ErrorCode::ScheduleDuplicateDay => "Schedule already defined for this day",

            ErrorCode::SpecialDayDuplicate => "Special day already defined for this date",
            ErrorCode::SpecialDayLabelRequired => "Special day label is required",
            ErrorCode::SpecialDayNotFound => "Special day not found",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Schedule storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
