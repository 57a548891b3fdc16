//! crab-hours CLI
//!
//! Operator tool around the schedule file: check the current status, preview
//! the next opening, validate hand edits, and watch status changes.

use anyhow::Context;
use clap::Parser;
use crab_hours::common::logger;
use crab_hours::hours::{describe, find_next_opening, weekday_index, weekday_short};
use crab_hours::utils::time;
use crab_hours::{Config, JsonScheduleStore, ScheduleSource, StatusWatcher, status_from_source};
use shared::models::ServiceType;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "crab-hours",
    version,
    about = "Store hours: open/closed status and schedule checks",
    after_help = "Examples:\n  crab-hours status --service delivery\n  crab-hours status --at \"2026-12-24 15:00\" --json\n  crab-hours next --service pickup\n  crab-hours validate\n  crab-hours watch --interval 30\n"
)]
struct Cli {
    /// Schedule JSON file (overrides SCHEDULE_FILE)
    #[arg(long, global = true)]
    schedule: Option<String>,

    /// Store time zone, IANA name (overrides STORE_TIMEZONE)
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Show whether the store is open
    Status {
        /// Service type: all, delivery or pickup
        #[arg(long, default_value = "all")]
        service: ServiceType,

        /// Evaluate at a store-local time instead of now ("YYYY-MM-DD HH:MM")
        #[arg(long)]
        at: Option<String>,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the next opening after a day (default today)
    Next {
        #[arg(long, default_value = "all")]
        service: ServiceType,

        /// Search from this date instead of today ("YYYY-MM-DD")
        #[arg(long)]
        date: Option<String>,
    },

    /// Strictly validate the schedule file
    Validate,

    /// Remove special days dated before today
    Prune,

    /// Poll the status and log every change until Ctrl-C
    Watch {
        #[arg(long, default_value = "all")]
        service: ServiceType,

        /// Poll interval in seconds (overrides WATCH_INTERVAL_SECS)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(schedule) = cli.schedule {
        config.schedule_file = schedule;
    }
    if let Some(tz) = cli.timezone {
        config.timezone = time::parse_timezone(&tz)?;
    }

    logger::init_logging(&config)?;
    for note in config.fallbacks() {
        tracing::warn!("{}", note);
    }
    tracing::debug!(
        schedule_file = %config.schedule_file,
        timezone = %config.timezone,
        "Configuration loaded"
    );

    let store = JsonScheduleStore::new(config.schedule_path());

    match cli.command {
        Commands::Status { service, at, json } => {
            let now = evaluation_time(at.as_deref(), &config)?;
            let status = status_from_source(&store, now, service)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{} ({}): {}", status.badge(), service, status.message);
                if let Some(event) = &status.active_special_event_name {
                    println!("  special day: {}", event);
                }
                if let Some(w) = &status.today_window {
                    match (&w.pause_start, &w.pause_end) {
                        (Some(ps), Some(pe)) => {
                            println!("  today: {}-{} (break {}-{})", w.open, w.close, ps, pe)
                        }
                        _ => println!("  today: {}-{}", w.open, w.close),
                    }
                }
                if let Some(hint) = &status.next_open_hint {
                    println!("  {}", hint);
                }
            }
        }
        Commands::Next { service, date } => {
            let from = match date {
                Some(value) => time::parse_date(&value)?,
                None => time::store_now(config.timezone).date(),
            };
            let weekly = store.weekly_schedules(Some(service))?;
            let specials = store.special_days_from(from)?;
            match find_next_opening(&weekly, &specials, from, service) {
                Some(next) => println!(
                    "{} ({} {})",
                    describe(&next),
                    weekday_short(weekday_index(next.date)).unwrap_or_default(),
                    next.date
                ),
                None => println!(
                    "No opening within {} days",
                    crab_hours::LOOKAHEAD_DAYS
                ),
            }
        }
        Commands::Validate => {
            store
                .validate()
                .with_context(|| format!("{} is invalid", store.path().display()))?;
            println!("{} is valid", store.path().display());
        }
        Commands::Prune => {
            let today = time::store_now(config.timezone).date();
            let removed = store.prune_past_special_days(today)?;
            println!("Removed {} past special day(s)", removed);
        }
        Commands::Watch { service, interval } => {
            let interval = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| config.watch_interval());
            let shutdown = CancellationToken::new();

            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    signal_token.cancel();
                }
            });

            let watcher = StatusWatcher::new(store, service, config.timezone, interval, shutdown);
            if let Some(last) = watcher.run().await {
                println!("{}: {}", last.badge(), last.message);
            }
        }
    }

    Ok(())
}

fn evaluation_time(at: Option<&str>, config: &Config) -> anyhow::Result<chrono::NaiveDateTime> {
    match at {
        Some(value) => Ok(time::parse_local_datetime(value)?),
        None => Ok(time::store_now(config.timezone)),
    }
}
