//! Store status resolution
//!
//! Priority, highest first:
//! 1. special day for today (the weekly schedule is not consulted at all)
//! 2. weekly row for today's weekday, specific service type before `all`
//! 3. time of day against the window, then the pause
//! 4. next-open search when nothing more opens today

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use shared::models::{
    DayHours, NextOpening, OpeningWindow, ServiceType, SpecialDay, StatusReason, StoreStatus,
    TodayWindow, WeeklySchedule,
};

use super::format::{format_time, weekday_index};
use super::lookup::{special_for_date, weekly_for_day};
use super::next_open::{describe, find_next_opening, opening_today};
use crate::utils::time;

/// Resolve open/closed status at `now` (store-local wall clock)
///
/// Total over its inputs: missing or malformed configuration resolves to
/// closed, never to an error.
pub fn resolve_status(
    weekly: &[WeeklySchedule],
    specials: &[SpecialDay],
    now: NaiveDateTime,
    service: ServiceType,
) -> StoreStatus {
    let ctx = Context {
        weekly,
        specials,
        today: now.date(),
        service,
    };

    let status = match special_for_date(specials, ctx.today, service) {
        Some(special) => ctx.resolve_special(special, now.time()),
        None => ctx.resolve_regular(now.time()),
    };

    tracing::debug!(
        now = %now,
        service_type = %service,
        is_open = status.is_open,
        reason = status.reason.as_str(),
        "Resolved store status"
    );
    status
}

/// Resolve against the system clock in the store time zone
pub fn current_status(
    weekly: &[WeeklySchedule],
    specials: &[SpecialDay],
    service: ServiceType,
    tz: Tz,
) -> StoreStatus {
    resolve_status(weekly, specials, time::store_now(tz), service)
}

struct Context<'a> {
    weekly: &'a [WeeklySchedule],
    specials: &'a [SpecialDay],
    today: NaiveDate,
    service: ServiceType,
}

impl Context<'_> {
    fn resolve_special(&self, special: &SpecialDay, now: NaiveTime) -> StoreStatus {
        match &special.hours {
            DayHours::Closed => self.closed_for_day(
                format!("Closed for {}", special.label),
                StatusReason::SpecialClosed,
                Some(special.label.as_str()),
            ),
            DayHours::Open(window) => self.resolve_window(window, now, Some(special.label.as_str())),
        }
    }

    fn resolve_regular(&self, now: NaiveTime) -> StoreStatus {
        let row = weekly_for_day(self.weekly, weekday_index(self.today), self.service);
        match row.map(|r| &r.hours) {
            Some(DayHours::Open(window)) => self.resolve_window(window, now, None),
            Some(DayHours::Closed) | None => self.closed_for_day(
                "Closed today".to_string(),
                StatusReason::RegularClosed,
                None,
            ),
        }
    }

    /// Day has a window; `label` is set when it comes from a special day
    fn resolve_window(
        &self,
        window: &OpeningWindow,
        now: NaiveTime,
        label: Option<&str>,
    ) -> StoreStatus {
        let today_window = Some(display_window(window));

        if !window.contains(now) {
            if now < window.open() {
                let next = opening_today(self.today, window.open(), label);
                return StoreStatus {
                    is_open: false,
                    message: format!("Opens today at {}", next.open_time),
                    reason: StatusReason::OutsideHours,
                    active_special_event_name: label.map(str::to_string),
                    today_window,
                    next_open_hint: Some(describe(&next)),
                    next_opening: Some(next),
                };
            }

            let mut status = self.closed_for_day(
                "Closed for today".to_string(),
                StatusReason::OutsideHours,
                label,
            );
            status.today_window = today_window;
            return status;
        }

        if let Some(pause) = window.pause()
            && pause.contains(now)
        {
            let next = opening_today(self.today, pause.end(), label);
            let hint = format!("Reopens today at {}", next.open_time);
            return StoreStatus {
                is_open: false,
                message: format!("On break until {}", next.open_time),
                reason: StatusReason::Pause,
                active_special_event_name: label.map(str::to_string),
                today_window,
                next_open_hint: Some(hint),
                next_opening: Some(next),
            };
        }

        let reason = if label.is_some() {
            StatusReason::SpecialOpen
        } else {
            StatusReason::RegularOpen
        };
        StoreStatus {
            is_open: true,
            message: format!("Open until {}", format_time(window.close())),
            reason,
            active_special_event_name: label.map(str::to_string),
            today_window,
            next_open_hint: None,
            next_opening: None,
        }
    }

    /// Nothing more opens today: search from tomorrow on
    fn closed_for_day(
        &self,
        message: String,
        reason: StatusReason,
        label: Option<&str>,
    ) -> StoreStatus {
        let next: Option<NextOpening> =
            find_next_opening(self.weekly, self.specials, self.today, self.service);
        StoreStatus {
            is_open: false,
            message,
            reason,
            active_special_event_name: label.map(str::to_string),
            today_window: None,
            next_open_hint: next.as_ref().map(describe),
            next_opening: next,
        }
    }
}

fn display_window(window: &OpeningWindow) -> TodayWindow {
    TodayWindow {
        open: format_time(window.open()),
        close: format_time(window.close()),
        pause_start: window.pause().map(|p| format_time(p.start())),
        pause_end: window.pause().map(|p| format_time(p.end())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PauseWindow;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// 2026-10-19 is a Monday
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_time(t(h, m))
    }

    fn window(open: NaiveTime, close: NaiveTime) -> OpeningWindow {
        OpeningWindow::new(open, close, None).unwrap()
    }

    fn weekly(day: u8, hours: DayHours) -> WeeklySchedule {
        WeeklySchedule::new(day, ServiceType::All, hours).unwrap()
    }

    #[test]
    fn test_open_within_window() {
        let schedules = vec![weekly(1, DayHours::Open(window(t(11, 0), t(22, 0))))];
        let status = resolve_status(&schedules, &[], monday_at(15, 0), ServiceType::All);
        assert!(status.is_open);
        assert_eq!(status.reason, StatusReason::RegularOpen);
        assert_eq!(status.message, "Open until 22:00");
        assert!(status.next_open_hint.is_none());
        assert_eq!(status.today_window.unwrap().open, "11:00");
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let schedules = vec![weekly(1, DayHours::Open(window(t(11, 0), t(22, 0))))];
        assert!(resolve_status(&schedules, &[], monday_at(11, 0), ServiceType::All).is_open);
        assert!(resolve_status(&schedules, &[], monday_at(22, 0), ServiceType::All).is_open);

        let after = resolve_status(&schedules, &[], monday_at(22, 1), ServiceType::All);
        assert!(!after.is_open);
        assert_eq!(after.reason, StatusReason::OutsideHours);
        assert_eq!(after.message, "Closed for today");
        assert_eq!(after.today_window.unwrap().close, "22:00");
    }

    #[test]
    fn test_before_open_points_to_today() {
        let schedules = vec![weekly(1, DayHours::Open(window(t(11, 0), t(22, 0))))];
        let status = resolve_status(&schedules, &[], monday_at(9, 30), ServiceType::All);
        assert!(!status.is_open);
        assert_eq!(status.reason, StatusReason::OutsideHours);
        assert_eq!(status.message, "Opens today at 11:00");
        assert_eq!(status.next_open_hint.as_deref(), Some("Opens today at 11:00"));
        assert_eq!(status.next_opening.unwrap().days_ahead, 0);
    }

    #[test]
    fn test_pause_reports_end() {
        let pause = PauseWindow::new(t(15, 0), t(18, 0)).unwrap();
        let w = OpeningWindow::new(t(11, 0), t(22, 0), Some(pause)).unwrap();
        let schedules = vec![weekly(1, DayHours::Open(w))];

        let status = resolve_status(&schedules, &[], monday_at(16, 0), ServiceType::All);
        assert!(!status.is_open);
        assert_eq!(status.reason, StatusReason::Pause);
        assert_eq!(status.message, "On break until 18:00");
        assert_eq!(status.next_open_hint.as_deref(), Some("Reopens today at 18:00"));
        let today = status.today_window.unwrap();
        assert_eq!(today.pause_start.as_deref(), Some("15:00"));

        let status = resolve_status(&schedules, &[], monday_at(18, 0), ServiceType::All);
        assert!(status.is_open);
    }

    #[test]
    fn test_no_row_is_regular_closed() {
        let status = resolve_status(&[], &[], monday_at(12, 0), ServiceType::All);
        assert!(!status.is_open);
        assert_eq!(status.reason, StatusReason::RegularClosed);
        assert!(status.next_open_hint.is_none());
        assert!(status.today_window.is_none());
    }

    #[test]
    fn test_special_open_hours_replace_regular() {
        let schedules = vec![weekly(1, DayHours::Open(window(t(11, 0), t(22, 0))))];
        let specials = vec![
            SpecialDay::new(
                monday_at(0, 0).date(),
                "Halloween brunch",
                ServiceType::All,
                DayHours::Open(window(t(9, 0), t(14, 0))),
            )
            .unwrap(),
        ];

        let status = resolve_status(&schedules, &specials, monday_at(10, 0), ServiceType::All);
        assert!(status.is_open);
        assert_eq!(status.reason, StatusReason::SpecialOpen);
        assert_eq!(status.active_special_event_name.as_deref(), Some("Halloween brunch"));
        assert_eq!(status.message, "Open until 14:00");

        let status = resolve_status(&schedules, &specials, monday_at(8, 0), ServiceType::All);
        assert_eq!(status.reason, StatusReason::OutsideHours);
        assert_eq!(status.active_special_event_name.as_deref(), Some("Halloween brunch"));
        assert_eq!(
            status.next_open_hint.as_deref(),
            Some("Opens today at 09:00 (Halloween brunch)")
        );

        // regular hours would still be open at 15:00
        let status = resolve_status(&schedules, &specials, monday_at(15, 0), ServiceType::All);
        assert!(!status.is_open);
        assert_eq!(status.reason, StatusReason::OutsideHours);
    }

    #[test]
    fn test_current_status_without_schedules_is_closed() {
        let status = current_status(&[], &[], ServiceType::Delivery, chrono_tz::Asia::Tokyo);
        assert!(!status.is_open);
        assert_eq!(status.reason, StatusReason::RegularClosed);
        assert_eq!(status.message, "Closed today");
        assert!(status.next_open_hint.is_none());
    }
}
