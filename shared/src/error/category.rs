//! Error code ranges

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Group of an [`ErrorCode`], taken from its thousands digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx
    General,
    /// 1xxx
    Schedule,
    /// 2xxx
    SpecialDay,
    /// 9xxx and anything unassigned
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Schedule,
            2 => Self::SpecialDay,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Schedule => "schedule",
            Self::SpecialDay => "special_day",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
