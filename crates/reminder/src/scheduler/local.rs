//! In-process scheduler backed by tokio timers.

use crate::ReminderScheduler;
use crate::error::{ErrorKind, Result};
use crate::reminder::{Permission, Reminder, Scheduled};
use async_trait::async_trait;
use time::UtcDateTime;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::task::JoinHandle;

/// Scheduler that fires reminders from tokio timer tasks.
///
/// A scheduled reminder is a task that sleeps for the reminder's delay and
/// then hands the reminder to the receiver returned by
/// [`LocalScheduler::new`]. Whoever owns the receiver is responsible for
/// showing it. Dropping the receiver makes further scheduling fail with
/// [`ErrorKind::Unavailable`].
///
/// At most one reminder is pending: scheduling a new one replaces (aborts)
/// the previous timer, and dropping the scheduler aborts whatever is left.
pub struct LocalScheduler {
    permission: RwLock<Permission>,
    sender: mpsc::UnboundedSender<Reminder>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl LocalScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reminder>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self { permission: RwLock::new(Permission::Undetermined), sender, pending: Mutex::new(None) };
        (scheduler, receiver)
    }

    /// Start from a known permission state instead of undetermined.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        *self.permission.get_mut() = permission;
        self
    }
}

impl Drop for LocalScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl ReminderScheduler for LocalScheduler {
    fn name(&self) -> &str {
        "local"
    }

    async fn permission(&self) -> Result<Permission> {
        Ok(*self.permission.read().await)
    }

    async fn request_permission(&self) -> Result<Permission> {
        let mut permission = self.permission.write().await;
        // A denial sticks, the same way the platform never prompts twice.
        if *permission == Permission::Undetermined {
            *permission = Permission::Granted;
        }
        Ok(*permission)
    }

    async fn schedule(&self, reminder: &Reminder) -> Result<Scheduled> {
        if !self.permission.read().await.is_granted() {
            exn::bail!(ErrorKind::PermissionDenied);
        }
        if self.sender.is_closed() {
            exn::bail!(ErrorKind::Unavailable);
        }
        let due_at = reminder.due_at(UtcDateTime::now())?;
        let sender = self.sender.clone();
        let fired = reminder.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(fired.delay).await;
            if sender.send(fired).is_err() {
                tracing::warn!("Reminder fired after its receiver was dropped");
            }
        });
        if let Some(previous) = self.pending.lock().await.replace(handle)
            && !previous.is_finished()
        {
            previous.abort();
            tracing::debug!("Replaced pending reminder");
        }
        tracing::info!(due_at = ?due_at, title = %reminder.title, "Scheduled reminder");
        Ok(Scheduled { reminder: reminder.clone(), due_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_permission_flow() {
        let (scheduler, _rx) = LocalScheduler::new();
        assert_eq!(scheduler.permission().await.unwrap(), Permission::Undetermined);
        assert_eq!(scheduler.request_permission().await.unwrap(), Permission::Granted);
        assert_eq!(scheduler.permission().await.unwrap(), Permission::Granted);
    }

    #[tokio::test]
    async fn test_denial_sticks() {
        let (scheduler, _rx) = LocalScheduler::new();
        let scheduler = scheduler.with_permission(Permission::Denied);
        assert_eq!(scheduler.request_permission().await.unwrap(), Permission::Denied);
        let err = scheduler.schedule(&Reminder::default()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::PermissionDenied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_after_delay() {
        let (scheduler, mut rx) = LocalScheduler::new();
        let scheduler = scheduler.with_permission(Permission::Granted);
        let reminder = Reminder::new("Reminder", "Back to it", Duration::from_secs(60));
        let scheduled = scheduler.schedule(&reminder).await.unwrap();
        assert_eq!(scheduled.reminder, reminder);

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.recv().await.unwrap(), reminder);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_reminder_replaces_pending_one() {
        let (scheduler, mut rx) = LocalScheduler::new();
        let scheduler = scheduler.with_permission(Permission::Granted);
        let first = Reminder::new("Reminder", "First", Duration::from_secs(60));
        let second = Reminder::new("Reminder", "Second", Duration::from_secs(120));
        scheduler.schedule(&first).await.unwrap();
        scheduler.schedule(&second).await.unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(rx.recv().await.unwrap(), second);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_reminder() {
        let (scheduler, mut rx) = LocalScheduler::new();
        let scheduler = scheduler.with_permission(Permission::Granted);
        scheduler.schedule(&Reminder::default()).await.unwrap();
        drop(scheduler);
        // Every sender is gone once the aborted task is dropped.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_schedule_without_receiver() {
        let (scheduler, rx) = LocalScheduler::new();
        let scheduler = scheduler.with_permission(Permission::Granted);
        drop(rx);
        let err = scheduler.schedule(&Reminder::default()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Unavailable);
    }
}
