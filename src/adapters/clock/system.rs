//! Wall-clock implementation of the Clock port.

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Reads the system clock. Business dates are the UTC calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
