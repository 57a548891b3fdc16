//! Error types

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use super::category::ErrorCategory;
use super::codes::ErrorCode;

/// Error carrying a code, a message, and the offending values
///
/// Details are keyed by field name (`day_of_week`, `date`, `pause_start`...)
/// and kept sorted so logs and CLI output are stable.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<BTreeMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail, replacing any earlier value under the same key
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Unparseable input value, `field` names where it came from
    pub fn invalid_format(field: &str, value: &str) -> Self {
        Self::with_message(
            ErrorCode::InvalidFormat,
            format!("Invalid {}: '{}'", field, value),
        )
        .with_detail("field", field)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Schedule file I/O failure
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }
}

pub type AppResult<T> = Result<T, AppError>;
