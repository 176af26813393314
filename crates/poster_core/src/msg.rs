use crate::{JobParams, NotificationId, PollOutcome, PollTicket, StatusSnapshot, SubmitOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the form.
    FormChanged(JobParams),
    /// User asked to generate from the current form.
    GenerateClicked,
    /// Response to the submission request.
    SubmitFinished(SubmitOutcome),
    /// Non-terminal status snapshot from the scheduler.
    PollProgress {
        ticket: PollTicket,
        snapshot: StatusSnapshot,
    },
    /// The scheduler stopped itself with a terminal outcome.
    PollFinished {
        ticket: PollTicket,
        outcome: PollOutcome,
    },
    /// User clicked "Create another".
    ResetClicked,
    /// User clicked "Try again" after an error.
    RetryClicked,
    /// User closed the notification.
    NotificationDismissed,
    /// The auto-dismiss timer elapsed.
    NotificationExpired { id: NotificationId },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
