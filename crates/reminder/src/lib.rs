//! Study reminders.
//!
//! When a study session starts, the core asks a [`ReminderScheduler`] to
//! nudge the user back after a fixed delay. The scheduler also owns the
//! notification permission. Scheduling never retries: callers decide what a
//! failure means (the app only logs it).

pub mod error;
mod reminder;
mod scheduler;

pub use crate::reminder::{DEFAULT_BODY, DEFAULT_DELAY, DEFAULT_TITLE, Permission, Reminder, Scheduled};
#[cfg(feature = "mock")]
pub use crate::scheduler::MockScheduler;
pub use crate::scheduler::{LocalScheduler, ReminderScheduler};
use std::sync::Arc;

pub type SchedulerHandle = Arc<dyn ReminderScheduler>;
