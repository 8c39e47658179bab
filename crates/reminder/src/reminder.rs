use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::{OptionExt, ResultExt};
use std::time::Duration;
use time::UtcDateTime;

pub const DEFAULT_TITLE: &str = "Reminder";
pub const DEFAULT_BODY: &str = "Do you want to continue learning?";
/// Two hours after a study session starts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2 * 60 * 60);

/// Notification permission as reported by the platform.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum Permission {
    #[display("granted")]
    Granted,
    #[display("denied")]
    Denied,
    /// The user has not been asked yet.
    #[default]
    #[display("undetermined")]
    Undetermined,
}
impl Permission {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// A local notification to deliver after a delay.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub delay: Duration,
}
impl Reminder {
    pub fn new(title: impl Into<String>, body: impl Into<String>, delay: Duration) -> Self {
        Self { title: title.into(), body: body.into(), delay }
    }

    /// When the reminder fires if scheduled at `now`.
    pub fn due_at(&self, now: UtcDateTime) -> Result<UtcDateTime> {
        let delay = time::Duration::try_from(self.delay).or_raise(|| ErrorKind::OutOfRange)?;
        now.checked_add(delay).ok_or_raise(|| ErrorKind::OutOfRange)
    }
}
impl Default for Reminder {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_BODY, DEFAULT_DELAY)
    }
}

/// A reminder accepted by a scheduler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scheduled {
    pub reminder: Reminder,
    pub due_at: UtcDateTime,
}
