//! Store hours resolution for the storefront, order intake and reporting
//!
//! - [`hours`]: pure open/closed resolution and write-path validation
//! - [`store`]: schedule data access ([`ScheduleSource`]) and the JSON file store
//! - [`watch`]: periodic status polling
//! - [`core`] / [`common`]: configuration and logging

pub mod common;
pub mod core;
pub mod hours;
pub mod store;
pub mod utils;
pub mod watch;

pub use core::Config;
pub use hours::{LOOKAHEAD_DAYS, current_status, find_next_opening, resolve_status};
pub use store::{JsonScheduleStore, ScheduleSource, StaticSchedules, status_from_source};
pub use watch::StatusWatcher;
