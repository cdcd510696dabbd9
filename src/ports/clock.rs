//! Clock port - Source of "now" and "today" for guards and the scheduler.

use chrono::NaiveDate;

use crate::domain::foundation::Timestamp;

/// Wall-clock abstraction so date-driven behaviour can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Current business date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
