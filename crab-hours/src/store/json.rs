//! JSON file schedule store
//!
//! One document per store. Reads are lenient: a row that fails validation
//! resolves to closed and a row that does not even decode is skipped.
//! Writes are strict and atomic (temp file + rename).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    ServiceType, SpecialDay, SpecialDayRow, WeeklySchedule, WeeklyScheduleRow,
};

use super::{ScheduleSource, filter_special_days, filter_weekly};
use crate::audit_log;
use crate::hours::validation::{
    parse_special_row, parse_special_rows, parse_weekly_row, parse_weekly_rows,
};

/// On-disk document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHoursDocument {
    #[serde(default)]
    pub weekly: Vec<WeeklyScheduleRow>,
    #[serde(default)]
    pub special_days: Vec<SpecialDayRow>,
}

/// Rows kept as raw JSON until each is converted on its own
#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    weekly: Vec<Value>,
    #[serde(default)]
    special_days: Vec<Value>,
}

fn strict_rows<T: DeserializeOwned>(
    path: &Path,
    section: &str,
    rows: Vec<Value>,
) -> AppResult<Vec<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|e| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("Invalid {} row {} in {}: {}", section, index, path.display(), e),
                )
                .with_detail("section", section)
                .with_detail("row", index)
            })
        })
        .collect()
}

fn lenient_rows<T: DeserializeOwned>(path: &Path, section: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    section,
                    row = index,
                    error = %e,
                    "Skipping unreadable schedule row"
                );
                None
            }
        })
        .collect()
}

/// File-backed [`ScheduleSource`] with a validating write path
#[derive(Debug)]
pub struct JsonScheduleStore {
    path: PathBuf,
    /// 串行化进程内的 读-改-写
    write_lock: Mutex<()>,
}

impl JsonScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document strictly: any row that does not deserialize fails
    /// the whole load. A missing file is an empty document.
    pub fn load(&self) -> AppResult<StoreHoursDocument> {
        let raw = self.read_raw()?;
        Ok(StoreHoursDocument {
            weekly: strict_rows(&self.path, "weekly", raw.weekly)?,
            special_days: strict_rows(&self.path, "special_days", raw.special_days)?,
        })
    }

    /// Read-path load: rows that do not deserialize are skipped with a warning
    fn load_lenient(&self) -> AppResult<StoreHoursDocument> {
        let raw = self.read_raw()?;
        Ok(StoreHoursDocument {
            weekly: lenient_rows(&self.path, "weekly", raw.weekly),
            special_days: lenient_rows(&self.path, "special_days", raw.special_days),
        })
    }

    /// Only unreadable files, broken JSON and a wrong top-level shape fail here
    fn read_raw(&self) -> AppResult<RawDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Schedule file not found, using empty schedule");
                return Ok(RawDocument::default());
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid schedule file {}: {}", self.path.display(), e),
            )
        })
    }

    /// Strict check of everything currently stored
    pub fn validate(&self) -> AppResult<()> {
        let doc = self.load()?;
        parse_weekly_rows(&doc.weekly)?;
        parse_special_rows(&doc.special_days)?;
        Ok(())
    }

    /// Replace the whole week (schedule editor "save")
    pub fn replace_weekly(&self, rows: &[WeeklyScheduleRow]) -> AppResult<Vec<WeeklySchedule>> {
        let schedules = parse_weekly_rows(rows)?;

        let _guard = self.lock();
        let mut doc = self.load()?;
        doc.weekly = schedules.iter().map(WeeklySchedule::to_row).collect();
        self.save(&doc)?;

        audit_log!(
            "replace_weekly",
            "store_hours:weekly",
            format!("{} rows", schedules.len())
        );
        Ok(schedules)
    }

    /// Insert or replace the row for (day, service type)
    pub fn upsert_weekly(&self, row: &WeeklyScheduleRow) -> AppResult<WeeklySchedule> {
        let schedule = parse_weekly_row(row)?;

        let _guard = self.lock();
        let mut doc = self.load()?;
        doc.weekly.retain(|r| {
            !(r.day_of_week == schedule.day_of_week && r.service_type == schedule.service_type)
        });
        doc.weekly.push(schedule.to_row());
        doc.weekly
            .sort_by_key(|r| (r.day_of_week, r.service_type.as_str()));
        self.save(&doc)?;

        audit_log!(
            "upsert_weekly",
            format!(
                "store_hours:weekly:{}:{}",
                schedule.day_of_week, schedule.service_type
            )
        );
        Ok(schedule)
    }

    /// Insert or replace the special day for (date, service type)
    pub fn upsert_special_day(&self, row: &SpecialDayRow) -> AppResult<SpecialDay> {
        let day = parse_special_row(row)?;

        let _guard = self.lock();
        let mut doc = self.load()?;
        doc.special_days
            .retain(|r| !(r.date == day.date && r.service_type == day.service_type));
        doc.special_days.push(day.to_row());
        doc.special_days.sort_by_key(|r| r.date);
        self.save(&doc)?;

        audit_log!(
            "upsert_special_day",
            format!("store_hours:special:{}:{}", day.date, day.service_type),
            day.label.as_str()
        );
        Ok(day)
    }

    pub fn delete_special_day(&self, date: NaiveDate, service: ServiceType) -> AppResult<()> {
        let _guard = self.lock();
        let mut doc = self.load()?;
        let before = doc.special_days.len();
        doc.special_days
            .retain(|r| !(r.date == date && r.service_type == service));
        if doc.special_days.len() == before {
            return Err(AppError::new(ErrorCode::SpecialDayNotFound)
                .with_detail("date", date.to_string())
                .with_detail("service_type", service.as_str()));
        }
        self.save(&doc)?;

        audit_log!(
            "delete_special_day",
            format!("store_hours:special:{}:{}", date, service)
        );
        Ok(())
    }

    /// Drop special days dated before `today`, returns how many were removed
    pub fn prune_past_special_days(&self, today: NaiveDate) -> AppResult<usize> {
        let _guard = self.lock();
        let mut doc = self.load()?;
        let before = doc.special_days.len();
        doc.special_days.retain(|r| r.date >= today);
        let removed = before - doc.special_days.len();
        if removed > 0 {
            self.save(&doc)?;
            tracing::info!(removed, %today, "Pruned past special days");
        }
        Ok(removed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, doc: &StoreHoursDocument) -> AppResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::storage(format!("Failed to create {}: {}", dir.display(), e)))?;

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| AppError::internal(format!("Failed to serialize schedules: {}", e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| AppError::storage(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| AppError::storage(format!("Failed to write schedules: {}", e)))?;
        tmp.persist(&self.path).map_err(|e| {
            AppError::storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            weekly = doc.weekly.len(),
            special_days = doc.special_days.len(),
            "Schedule file saved"
        );
        Ok(())
    }
}

impl ScheduleSource for JsonScheduleStore {
    fn weekly_schedules(&self, service: Option<ServiceType>) -> AppResult<Vec<WeeklySchedule>> {
        let doc = self.load_lenient()?;
        let schedules = doc.weekly.iter().filter_map(WeeklySchedule::from_row_lenient);
        Ok(filter_weekly(schedules, service))
    }

    fn special_days_from(&self, from: NaiveDate) -> AppResult<Vec<SpecialDay>> {
        let doc = self.load_lenient()?;
        let days = doc.special_days.iter().map(SpecialDay::from_row_lenient);
        Ok(filter_special_days(days, from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn weekly_row(day: u8, open: &str, close: &str) -> WeeklyScheduleRow {
        WeeklyScheduleRow {
            day_of_week: day,
            is_open: true,
            open_time: Some(open.into()),
            close_time: Some(close.into()),
            pause_start: None,
            pause_end: None,
            service_type: ServiceType::All,
        }
    }

    fn special_row(date: NaiveDate, label: &str) -> SpecialDayRow {
        SpecialDayRow {
            date,
            label: label.into(),
            is_open: false,
            open_time: None,
            close_time: None,
            pause_start: None,
            pause_end: None,
            service_type: ServiceType::All,
        }
    }

    fn store(dir: &TempDir) -> JsonScheduleStore {
        JsonScheduleStore::new(dir.path().join("hours").join("store_hours.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.load().unwrap(), StoreHoursDocument::default());
        assert!(store.weekly_schedules(None).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_weekly_replaces_same_day() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.upsert_weekly(&weekly_row(1, "11:00", "22:00")).unwrap();
        store.upsert_weekly(&weekly_row(1, "12:00", "23:00")).unwrap();
        store.upsert_weekly(&weekly_row(0, "10:00", "14:00")).unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.weekly.len(), 2);
        assert_eq!(doc.weekly[0].day_of_week, 0);
        assert_eq!(doc.weekly[1].open_time.as_deref(), Some("12:00:00"));
    }

    #[test]
    fn test_invalid_write_is_rejected_and_not_persisted() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.upsert_weekly(&weekly_row(1, "11:00", "22:00")).unwrap();

        let err = store.upsert_weekly(&weekly_row(1, "22:00", "22:00")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ScheduleEmptyWindow);

        let doc = store.load().unwrap();
        assert_eq!(doc.weekly[0].open_time.as_deref(), Some("11:00:00"));
    }

    #[test]
    fn test_replace_weekly_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let rows = vec![weekly_row(3, "11:00", "22:00"), weekly_row(3, "12:00", "22:00")];
        let err = store.replace_weekly(&rows).unwrap_err();
        assert_eq!(err.code, ErrorCode::ScheduleDuplicateDay);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_special_day_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let christmas = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        store.upsert_special_day(&special_row(christmas, "Christmas")).unwrap();
        store.upsert_special_day(&special_row(past, "New Year")).unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let upcoming = store.special_days_from(today).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].label, "Christmas");

        assert_eq!(store.prune_past_special_days(today).unwrap(), 1);
        assert_eq!(store.load().unwrap().special_days.len(), 1);

        store.delete_special_day(christmas, ServiceType::All).unwrap();
        let err = store
            .delete_special_day(christmas, ServiceType::All)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SpecialDayNotFound);
    }

    #[test]
    fn test_lenient_read_of_hand_edited_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{
                "weekly": [
                    {"day_of_week": 1, "is_open": true, "open_time": "11:00", "close_time": null,
                     "pause_start": null, "pause_end": null},
                    {"day_of_week": 9, "is_open": false, "open_time": null, "close_time": null,
                     "pause_start": null, "pause_end": null},
                    {"day_of_week": 2, "is_open": true, "open_time": "11:00", "close_time": "22:00",
                     "pause_start": null, "pause_end": null, "service_type": "delivery"}
                ]
            }"#,
        )
        .unwrap();

        let all = store.weekly_schedules(None).unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all[0].hours.is_open());

        let pickup = store.weekly_schedules(Some(ServiceType::Pickup)).unwrap();
        assert_eq!(pickup.len(), 1);

        assert!(store.validate().is_err());
    }

    #[test]
    fn test_undecodable_rows_are_skipped_on_read() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{
                "weekly": [
                    {"day_of_week": 1, "is_open": true, "open_time": "11:00", "close_time": "22:00"},
                    {"day_of_week": 300, "is_open": false},
                    {"day_of_week": 3, "is_open": true, "open_time": 1100, "close_time": "22:00"}
                ],
                "special_days": [
                    {"date": "2026-02-30", "label": "Bad", "is_open": false},
                    {"date": "2026-12-25", "label": "Christmas", "is_open": false}
                ]
            }"#,
        )
        .unwrap();

        let weekly = store.weekly_schedules(None).unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].day_of_week, 1);
        assert!(weekly[0].hours.is_open());

        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let specials = store.special_days_from(new_year).unwrap();
        assert_eq!(specials.len(), 1);
        assert_eq!(specials[0].label, "Christmas");

        let err = store.load().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        let details = err.details.unwrap();
        assert_eq!(details["section"], Value::from("weekly"));
        assert_eq!(details["row"], Value::from(1));
    }

    #[test]
    fn test_wrong_top_level_shape_is_format_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"weekly": {"day_of_week": 1}}"#).unwrap();
        let err = store.weekly_schedules(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_corrupt_file_is_format_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        let err = store.load().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}
