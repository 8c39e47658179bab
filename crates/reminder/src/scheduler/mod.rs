//! Reminder scheduler trait and implementations.
//!
//! Delivering notifications is the platform's business. The core only asks
//! a scheduler to fire a reminder after a delay, and to report or request
//! notification permission.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalScheduler;
#[cfg(feature = "mock")]
pub use self::mock::MockScheduler;
use crate::error::Result;
use crate::reminder::{Permission, Reminder, Scheduled};
use async_trait::async_trait;

/// Unified interface for reminder schedulers.
///
/// # Examples
///
/// ```
/// use recall_reminder::{Reminder, ReminderScheduler, error::Result};
///
/// async fn remind_if_allowed(scheduler: &dyn ReminderScheduler) -> Result<bool> {
///     if !scheduler.permission().await?.is_granted() {
///         return Ok(false);
///     }
///     scheduler.schedule(&Reminder::default()).await?;
///     Ok(true)
/// }
/// ```
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Name of the scheduler, for logging.
    fn name(&self) -> &str;

    /// Current notification permission, without prompting the user.
    async fn permission(&self) -> Result<Permission>;

    /// Ask the user for notification permission and return the outcome.
    async fn request_permission(&self) -> Result<Permission>;

    /// Schedule a reminder to fire after [`Reminder::delay`].
    async fn schedule(&self, reminder: &Reminder) -> Result<Scheduled>;
}
