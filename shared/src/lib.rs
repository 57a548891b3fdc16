//! Shared types for the store hours crates
//!
//! Schedule models, the computed store status, and the unified error types
//! used by every crate that reads or writes business hours.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{ServiceType, SpecialDay, StoreStatus, WeeklySchedule};
