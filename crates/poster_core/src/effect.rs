use crate::{JobId, JobParams, NotificationId, PollTicket};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubmitJob { params: JobParams },
    StartPolling { ticket: PollTicket, job_id: JobId },
    /// Idempotent; emitted on every exit from `Generating`.
    StopPolling,
    ShowNotification { id: NotificationId, message: String },
    /// Cancels the pending auto-dismiss timer, if any.
    CancelNotification,
}
