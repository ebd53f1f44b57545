//! Opt-in guard that ends a run early on weekends and holidays.
//!
//! Whatever triggers the binary (cron, a CI schedule) fires every day; the
//! guard lets the configuration decide which days actually produce a digest.

use crate::config::ScheduleConfig;
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Weekend(Weekday),
    Holiday(NaiveDate),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Weekend(day) => write!(f, "weekend ({day})"),
            SkipReason::Holiday(date) => write!(f, "holiday ({date})"),
        }
    }
}

/// Why `today` should not produce a digest, if it shouldn't.
pub fn skip_reason(today: NaiveDate, schedule: &ScheduleConfig) -> Option<SkipReason> {
    if schedule.holidays.contains(&today) {
        return Some(SkipReason::Holiday(today));
    }
    match today.weekday() {
        day @ (Weekday::Sat | Weekday::Sun) if schedule.skip_weekends => Some(SkipReason::Weekend(day)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_guard_disabled_by_default() {
        let schedule = ScheduleConfig::default();
        // 2026-10-17 is a Saturday.
        assert_eq!(skip_reason(date(2026, 10, 17), &schedule), None);
    }

    #[test]
    fn test_weekend_skip() {
        let schedule = ScheduleConfig {
            skip_weekends: true,
            ..ScheduleConfig::default()
        };
        assert_eq!(
            skip_reason(date(2026, 10, 17), &schedule),
            Some(SkipReason::Weekend(Weekday::Sat))
        );
        assert_eq!(
            skip_reason(date(2026, 10, 18), &schedule),
            Some(SkipReason::Weekend(Weekday::Sun))
        );
        assert_eq!(skip_reason(date(2026, 10, 16), &schedule), None);
    }

    #[test]
    fn test_holiday_skip_on_weekday() {
        let schedule = ScheduleConfig {
            holidays: vec![date(2026, 10, 9)],
            ..ScheduleConfig::default()
        };
        let reason = skip_reason(date(2026, 10, 9), &schedule).unwrap();
        assert_eq!(reason, SkipReason::Holiday(date(2026, 10, 9)));
        assert_eq!(reason.to_string(), "holiday (2026-10-09)");
        assert_eq!(skip_reason(date(2026, 10, 8), &schedule), None);
    }
}
