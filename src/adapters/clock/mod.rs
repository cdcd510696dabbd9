//! Clock adapters.
//!
//! - **SystemClock** - Wall clock, UTC
//! - **FixedClock** - Settable clock for tests and replays

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;
