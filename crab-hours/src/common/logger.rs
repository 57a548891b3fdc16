//! Logging setup
//!
//! - console: readable in development, JSON when `LOG_JSON=true`
//! - `LOG_DIR/hours/crab-hours.YYYY-MM-DD`: runtime log, daily rotation, kept 14 days
//! - `LOG_DIR/audit/changes.YYYY-MM-DD`: schedule edits (target `audit`), kept forever

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::core::Config;

const RUNTIME_DIR: &str = "hours";
const RUNTIME_PREFIX: &str = "crab-hours";
const AUDIT_DIR: &str = "audit";
const AUDIT_PREFIX: &str = "changes";
pub const AUDIT_TARGET: &str = "audit";

const RUNTIME_RETENTION_DAYS: i64 = 14;
const PRUNE_INTERVAL: Duration = Duration::from_secs(3600);

/// Install the global subscriber from the logging fields of [`Config`]
///
/// `RUST_LOG` wins over `LOG_LEVEL` when set; production always logs JSON.
/// With `LOG_DIR` the file layers are added and a pruning task is spawned,
/// so that case needs a tokio runtime.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let console = if config.log_json || config.is_production() {
        fmt::layer().json().with_current_span(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let Some(dir) = config.log_dir.as_deref().map(Path::new) else {
        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .try_init()?;
        return Ok(());
    };

    let runtime = fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(daily_writer(&dir.join(RUNTIME_DIR), RUNTIME_PREFIX)?)
        .with_filter(filter_fn(|meta| meta.target() != AUDIT_TARGET));

    // 审计日志只收 target = "audit" 的事件
    let audit = fmt::layer()
        .json()
        .with_writer(daily_writer(&dir.join(AUDIT_DIR), AUDIT_PREFIX)?)
        .with_filter(filter_fn(|meta| meta.target() == AUDIT_TARGET));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(runtime)
        .with(audit)
        .try_init()?;

    tokio::spawn(prune_periodically(dir.to_path_buf()));
    Ok(())
}

fn daily_writer(dir: &Path, prefix: &str) -> anyhow::Result<Mutex<RollingFileAppender>> {
    fs::create_dir_all(dir)?;
    Ok(Mutex::new(RollingFileAppender::new(
        Rotation::DAILY,
        dir,
        prefix,
    )))
}

/// Delete runtime log files older than the retention window
///
/// Only `crab-hours.YYYY-MM-DD` files under `hours/` are touched; the audit
/// directory is never pruned. Returns the number of files removed.
pub fn prune_runtime_logs(log_dir: &Path, today: NaiveDate) -> anyhow::Result<usize> {
    let dir = log_dir.join(RUNTIME_DIR);
    if !dir.is_dir() {
        return Ok(0);
    }

    let cutoff = today - chrono::Duration::days(RUNTIME_RETENTION_DAYS);
    let mut removed = 0;
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if rotated_date(&path).is_some_and(|date| date < cutoff) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if removed > 0 {
        tracing::info!(removed, %cutoff, "Pruned expired runtime logs");
    }
    Ok(removed)
}

/// Date suffix added by daily rotation
fn rotated_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let suffix = name.strip_prefix(RUNTIME_PREFIX)?.strip_prefix('.')?;
    NaiveDate::parse_from_str(suffix, "%Y-%m-%d").ok()
}

async fn prune_periodically(log_dir: PathBuf) {
    let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
    loop {
        ticker.tick().await;
        let today = chrono::Local::now().date_naive();
        if let Err(e) = prune_runtime_logs(&log_dir, today) {
            tracing::error!(error = %e, "Failed to prune runtime logs");
        }
    }
}

/// Record a schedule change on the audit target
///
/// ```ignore
/// audit_log!("upsert_weekly", "weekly:1:all");
/// audit_log!("upsert_special_day", "special:2026-12-25:all", "Christmas");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr $(,)?) => {
        $crate::audit_log!($action, $resource, "-")
    };
    ($action:expr, $resource:expr, $details:expr $(,)?) => {
        ::tracing::info!(
            target: "audit",
            action = $action,
            resource = %$resource,
            details = %$details,
            recorded_at = %::chrono::Utc::now().to_rfc3339(),
            "schedule changed"
        )
    };
}
