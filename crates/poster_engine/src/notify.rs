use std::sync::Arc;
use std::time::Duration;

use poster_core::NotificationId;
use poster_logging::poster_debug;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::Sleeper;

struct PendingDismiss {
    id: NotificationId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Auto-dismiss timer for the success notification. Holds at most one pending timer.
pub struct NotificationTimer {
    sleeper: Arc<dyn Sleeper>,
    pending: Option<PendingDismiss>,
}

impl NotificationTimer {
    pub fn new(sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            sleeper,
            pending: None,
        }
    }

    /// Fires `on_expire` after `after` unless cancelled first. Replaces any pending timer.
    pub fn schedule<F>(&mut self, id: NotificationId, after: Duration, on_expire: F)
    where
        F: FnOnce(NotificationId) + Send + 'static,
    {
        self.cancel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let sleeper = self.sleeper.clone();
        poster_debug!("Notification {:?} dismisses in {:?}", id, after);
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_cancel.cancelled() => {}
                _ = sleeper.sleep(after) => {
                    if !task_cancel.is_cancelled() {
                        on_expire(id);
                    }
                }
            }
        });
        self.pending = Some(PendingDismiss { id, cancel, task });
    }

    /// Cancels the pending timer, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.task.is_finished() {
                poster_debug!("Notification {:?} timer cancelled", pending.id);
            }
            pending.cancel.cancel();
            pending.task.abort();
        }
    }

    /// Whether a scheduled dismissal has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }
}

impl Drop for NotificationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
