//! Store hours
//!
//! Pure resolution of the open/closed verdict from weekly schedules and
//! special days, plus the validation used when schedules are written.

pub mod format;
pub mod lookup;
pub mod next_open;
pub mod resolver;
pub mod validation;

pub use format::{format_time, weekday_index, weekday_name, weekday_short};
pub use lookup::{special_for_date, weekly_for_day};
pub use next_open::{LOOKAHEAD_DAYS, describe, find_next_opening};
pub use resolver::{current_status, resolve_status};
pub use validation::{validate_pause, validate_special_days, validate_weekly};
