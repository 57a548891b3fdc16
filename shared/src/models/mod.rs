//! Data models
//!
//! Shared between the hours resolver, the schedule store and API consumers.
//! `*Row` types are the flat storage shape; validated types enforce invariants.

pub mod store_hours;
pub mod store_status;

// Re-exports
pub use store_hours::*;
pub use store_status::*;
