//! Time source for scheduling.
//!
//! Everything that needs "now" or "today" goes through a [`Clock`] so tests can
//! pin time with [`FixedClock`] and step it forward day by day.

use crate::error::{RepsError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current date, truncated to day granularity.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// `date` moved by `days`; dates past chrono's range are a store error.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| RepsError::Store(format!("{} plus {} days is out of range", date, days)))
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midnight UTC of the given calendar date.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock();
        *now += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_truncates_time_of_day() {
        let now = date(2024, 3, 9).and_hms_opt(23, 59, 59).unwrap().and_utc();
        let clock = FixedClock::new(now);
        assert_eq!(clock.today(), date(2024, 3, 9));
    }

    #[test]
    fn advance_moves_today() {
        let clock = FixedClock::at_date(date(2024, 2, 27));
        clock.advance_days(3);
        assert_eq!(clock.today(), date(2024, 3, 1));
    }

    #[test]
    fn add_days_and_days_between_agree() {
        let start = date(2023, 12, 30);
        let end = add_days(start, 5).unwrap();
        assert_eq!(end, date(2024, 1, 4));
        assert_eq!(days_between(start, end), 5);
        assert_eq!(days_between(end, start), -5);
    }

    #[test]
    fn add_days_past_max_date_is_an_error() {
        let err = add_days(NaiveDate::MAX, 1).unwrap_err();
        assert!(matches!(err, RepsError::Store(_)));
        assert!(add_days(date(2024, 1, 1), i64::MAX).is_err());
    }
}
