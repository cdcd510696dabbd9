//! Settable clock for tests.
//!
//! # Example
//!
//! ```ignore
//! let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! clock.advance_days(30);
//! assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
//! ```

use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Clock set to 09:00 UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(Timestamp::from_datetime(nine_am(date)))
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.set(Timestamp::from_datetime(nine_am(date)));
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = now.plus_secs(secs);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_secs(days * 86_400);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

fn nine_am(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(9, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn at_date_reports_that_date() {
        let clock = FixedClock::at_date(date(2024, 3, 1));
        assert_eq!(clock.today(), date(2024, 3, 1));
    }

    #[test]
    fn advance_days_crosses_month_boundary() {
        let clock = FixedClock::at_date(date(2024, 2, 28));
        clock.advance_days(2);
        assert_eq!(clock.today(), date(2024, 3, 1));
    }

    #[test]
    fn advance_secs_moves_now_forward() {
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let before = clock.now();
        clock.advance_secs(5);
        assert!(before.is_before(&clock.now()));
    }

    #[test]
    fn set_date_replaces_current_time() {
        let clock = FixedClock::at_date(date(2024, 1, 1));
        clock.set_date(date(2023, 6, 15));
        assert_eq!(clock.today(), date(2023, 6, 15));
    }
}
