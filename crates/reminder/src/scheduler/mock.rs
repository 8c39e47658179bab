//! Recording scheduler for testing.

use crate::ReminderScheduler;
use crate::error::{ErrorKind, Result};
use crate::reminder::{Permission, Reminder, Scheduled};
use async_trait::async_trait;
use time::UtcDateTime;
use tokio::sync::RwLock;

/// Scheduler that records reminders instead of firing them.
///
/// Ideal for tests of code that schedules reminders: nothing is spawned and
/// the recorded reminders can be inspected afterwards.
///
/// ```
/// use recall_reminder::{MockScheduler, Reminder, ReminderScheduler};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scheduler = MockScheduler::default();
/// scheduler.schedule(&Reminder::default()).await?;
/// assert_eq!(scheduler.scheduled().await.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockScheduler {
    permission: RwLock<Permission>,
    unavailable: bool,
    scheduled: RwLock<Vec<Scheduled>>,
}

impl MockScheduler {
    pub fn with_permission(permission: Permission) -> Self {
        Self { permission: RwLock::new(permission), unavailable: false, scheduled: RwLock::new(Vec::new()) }
    }

    /// A scheduler whose every `schedule` call fails with [`ErrorKind::Unavailable`].
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    /// Everything scheduled so far, oldest first.
    pub async fn scheduled(&self) -> Vec<Scheduled> {
        self.scheduled.read().await.clone()
    }
}
impl Default for MockScheduler {
    fn default() -> Self {
        Self::with_permission(Permission::Granted)
    }
}

#[async_trait]
impl ReminderScheduler for MockScheduler {
    fn name(&self) -> &str {
        "mock"
    }

    async fn permission(&self) -> Result<Permission> {
        Ok(*self.permission.read().await)
    }

    async fn request_permission(&self) -> Result<Permission> {
        let mut permission = self.permission.write().await;
        if *permission == Permission::Undetermined {
            *permission = Permission::Granted;
        }
        Ok(*permission)
    }

    async fn schedule(&self, reminder: &Reminder) -> Result<Scheduled> {
        if self.unavailable {
            exn::bail!(ErrorKind::Unavailable);
        }
        if !self.permission.read().await.is_granted() {
            exn::bail!(ErrorKind::PermissionDenied);
        }
        let scheduled = Scheduled { reminder: reminder.clone(), due_at: reminder.due_at(UtcDateTime::now())? };
        self.scheduled.write().await.push(scheduled.clone());
        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_reminders() {
        let scheduler = MockScheduler::default();
        scheduler.schedule(&Reminder::default()).await.unwrap();
        scheduler.schedule(&Reminder::default()).await.unwrap();
        assert_eq!(scheduler.scheduled().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let scheduler = MockScheduler::unavailable();
        let err = scheduler.schedule(&Reminder::default()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Unavailable);
        assert!(scheduler.scheduled().await.is_empty());
    }

    #[tokio::test]
    async fn test_undetermined_permission_blocks_scheduling() {
        let scheduler = MockScheduler::with_permission(Permission::Undetermined);
        let err = scheduler.schedule(&Reminder::default()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::PermissionDenied);
        assert_eq!(scheduler.request_permission().await.unwrap(), Permission::Granted);
        scheduler.schedule(&Reminder::default()).await.unwrap();
    }
}
