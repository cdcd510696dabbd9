//! Notification adapters.
//!
//! - **LoggingNotificationSender** - Writes each notification as a structured log line
//! - **RecordingNotificationSender** - Keeps notifications in memory (testing)

mod logging;
mod recording;

pub use logging::LoggingNotificationSender;
pub use recording::RecordingNotificationSender;
