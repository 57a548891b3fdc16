//! 时间工具函数: 门店时区转换
//!
//! 营业时间全部按门店本地墙钟时间比较，
//! UTC → 本地时间的转换统一在这里完成。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};

/// 时钟来源，测试中可替换为固定时间
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统墙钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定时间 (测试用)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// UTC 时间 → 门店本地墙钟时间
pub fn to_store_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// 门店当前本地时间
pub fn store_now(tz: Tz) -> NaiveDateTime {
    to_store_local(Utc::now(), tz)
}

/// 解析 IANA 时区名 (如 "Europe/Madrid")
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::invalid_format("timezone", name))
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format("date", date))
}

/// 解析本地日期时间
///
/// 支持 `YYYY-MM-DDTHH:MM[:SS]` 和 `YYYY-MM-DD HH:MM[:SS]`
pub fn parse_local_datetime(value: &str) -> AppResult<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| AppError::invalid_format("datetime", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_to_store_local_applies_offset() {
        // 2026-07-01 10:00 UTC = 12:00 Madrid (CEST)
        let instant = Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).unwrap();
        let local = to_store_local(instant, chrono_tz::Europe::Madrid);
        assert_eq!(local.hour(), 12);

        // 冬令时 UTC+1
        let instant = Utc.with_ymd_and_hms(2026, 1, 15, 23, 30, 0).unwrap();
        let local = to_store_local(instant, chrono_tz::Europe::Madrid);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
        assert_eq!(local.hour(), 0);
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Madrid").unwrap(), chrono_tz::Europe::Madrid);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-12-25").unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()
        );
        assert!(parse_date("25/12/2026").is_err());
    }

    #[test]
    fn test_parse_local_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        assert_eq!(parse_local_datetime("2026-10-19T15:00").unwrap(), expected);
        assert_eq!(parse_local_datetime("2026-10-19 15:00:00").unwrap(), expected);
        assert!(parse_local_datetime("tomorrow").is_err());
    }
}
