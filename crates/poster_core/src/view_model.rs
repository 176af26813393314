use crate::{JobId, LifecycleState, NotificationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: NotificationId,
    pub message: String,
}

/// Everything the UI reads. Derived from `AppState`, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub state: LifecycleState,
    pub place: String,
    pub can_submit: bool,
    pub submitting: bool,
    pub job_id: Option<JobId>,
    pub estimated_seconds: Option<u32>,
    /// Raw stage label of the latest snapshot.
    pub stage: Option<String>,
    /// Progress line while generating.
    pub progress_message: Option<&'static str>,
    pub artifact: Option<String>,
    /// Error or rate-limit message.
    pub message: Option<String>,
    pub notification: Option<NotificationView>,
    /// Whether anything changed since the last `consume_dirty`.
    pub dirty: bool,
}
