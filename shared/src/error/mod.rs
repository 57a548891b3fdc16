//! Unified error system for the store hours crates
//!
//! Every failure on the schedule write path and in storage carries a numeric
//! [`ErrorCode`]; [`ErrorCategory`] groups codes by range and [`AppError`]
//! adds a message plus structured details (offending day, date, field).
//!
//! | Range | Category |
//! |-------|----------|
//! | 0xxx | general (input format) |
//! | 1xxx | weekly schedule |
//! | 2xxx | special day |
//! | 9xxx | system (storage, internal) |
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCategory, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ScheduleEmptyWindow);
//! assert_eq!(err.category(), ErrorCategory::Schedule);
//!
//! let err = AppError::new(ErrorCode::ScheduleDuplicateDay)
//!     .with_detail("day_of_week", 1);
//! assert_eq!(err.code.code(), 1007);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
