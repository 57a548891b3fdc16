pub mod logger;

pub use logger::{init_logging, prune_runtime_logs};
