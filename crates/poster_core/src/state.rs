use poster_logging::poster_debug;

use crate::status::stage_message;
use crate::view_model::{AppViewModel, NotificationView};
use crate::{Job, JobId, JobParams, StatusSnapshot};

/// Externally observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// The form is shown; no job is associated.
    #[default]
    Idle,
    Generating,
    Completed,
    Error,
    RateLimited,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Idle => "default",
            LifecycleState::Generating => "generating",
            LifecycleState::Completed => "completed",
            LifecycleState::Error => "error",
            LifecycleState::RateLimited => "rate_limited",
        }
    }

    /// States left only by an explicit user action.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LifecycleState::Completed | LifecycleState::Error | LifecycleState::RateLimited
        )
    }
}

/// Identifies one polling run. Events carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, PartialEq)]
struct Notification {
    id: NotificationId,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    lifecycle: LifecycleState,
    form: JobParams,
    submitting: bool,
    job: Option<Job>,
    active_ticket: Option<PollTicket>,
    tickets_issued: u64,
    last_snapshot: Option<StatusSnapshot>,
    artifact: Option<String>,
    error_message: Option<String>,
    notification: Option<Notification>,
    notifications_issued: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let message = match self.lifecycle {
            LifecycleState::Error => self.error_message.clone(),
            LifecycleState::RateLimited => Some(crate::messages::RATE_LIMITED.to_string()),
            _ => None,
        };
        let progress_message = (self.lifecycle == LifecycleState::Generating).then(|| {
            stage_message(
                self.last_snapshot
                    .as_ref()
                    .and_then(|snapshot| snapshot.stage.as_deref()),
            )
        });

        AppViewModel {
            state: self.lifecycle,
            place: self.form.place.clone(),
            can_submit: self.can_submit(),
            submitting: self.submitting,
            job_id: self.job.as_ref().map(|job| job.id.clone()),
            estimated_seconds: self.job.as_ref().map(|job| job.estimated_seconds),
            stage: self
                .last_snapshot
                .as_ref()
                .and_then(|snapshot| snapshot.stage.clone()),
            progress_message,
            artifact: self.artifact.clone(),
            message,
            notification: self.notification.as_ref().map(|n| NotificationView {
                id: n.id,
                message: n.message.clone(),
            }),
            dirty: self.dirty,
        }
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    pub fn form(&self) -> &JobParams {
        &self.form
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn active_ticket(&self) -> Option<PollTicket> {
        self.active_ticket
    }

    pub fn last_snapshot(&self) -> Option<&StatusSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        self.lifecycle == LifecycleState::Idle && !self.submitting && self.form.validate().is_ok()
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_form(&mut self, form: JobParams) {
        self.form = form;
        self.mark_dirty();
    }

    pub(crate) fn begin_submit(&mut self) -> JobParams {
        self.submitting = true;
        self.mark_dirty();
        self.form.clone()
    }

    pub(crate) fn end_submit(&mut self) {
        self.submitting = false;
        self.mark_dirty();
    }

    /// Associates the accepted job and allocates a fresh ticket for its polling run.
    pub(crate) fn enter_generating(&mut self, id: JobId, estimated_seconds: u32) -> PollTicket {
        self.tickets_issued += 1;
        let ticket = PollTicket(self.tickets_issued);
        self.job = Some(Job {
            id,
            params: self.form.clone(),
            estimated_seconds,
        });
        self.active_ticket = Some(ticket);
        self.last_snapshot = None;
        self.lifecycle = LifecycleState::Generating;
        self.mark_dirty();
        ticket
    }

    pub(crate) fn is_active_ticket(&self, ticket: PollTicket) -> bool {
        let active =
            self.lifecycle == LifecycleState::Generating && self.active_ticket == Some(ticket);
        if !active {
            poster_debug!(
                "Dropping event for stale poll ticket {:?} (active {:?}, state {})",
                ticket,
                self.active_ticket,
                self.lifecycle.as_str()
            );
        }
        active
    }

    pub(crate) fn record_snapshot(&mut self, snapshot: StatusSnapshot) {
        self.last_snapshot = Some(snapshot);
        self.mark_dirty();
    }

    /// Leaves `Generating`; the caller must emit `Effect::StopPolling`.
    fn leave_generating(&mut self, next: LifecycleState) {
        self.active_ticket = None;
        self.lifecycle = next;
        self.mark_dirty();
    }

    pub(crate) fn complete(&mut self, artifact: Option<String>) -> (NotificationId, String) {
        self.leave_generating(LifecycleState::Completed);
        self.artifact = artifact;
        self.notifications_issued += 1;
        let id = NotificationId(self.notifications_issued);
        let message = format!("Your poster of {} is ready!", self.form.place.trim());
        self.notification = Some(Notification {
            id,
            message: message.clone(),
        });
        (id, message)
    }

    pub(crate) fn fail_generating(&mut self, message: String) {
        self.leave_generating(LifecycleState::Error);
        self.error_message = Some(message);
    }

    /// Submission was refused; no job is created.
    pub(crate) fn reject_submit(&mut self, next: LifecycleState, message: Option<String>) {
        self.lifecycle = next;
        self.error_message = message;
        self.mark_dirty();
    }

    /// Returns to `Idle`, discarding the job. `clear_form` distinguishes reset from retry.
    pub(crate) fn return_to_idle(&mut self, clear_form: bool) {
        self.lifecycle = LifecycleState::Idle;
        self.job = None;
        self.active_ticket = None;
        self.last_snapshot = None;
        self.artifact = None;
        self.error_message = None;
        if clear_form {
            self.form = JobParams::default();
        }
        self.mark_dirty();
    }

    pub(crate) fn has_notification(&self) -> bool {
        self.notification.is_some()
    }

    /// Clears the notification if it is the one identified by `id` (any when `None`).
    pub(crate) fn clear_notification(&mut self, id: Option<NotificationId>) -> bool {
        let matches = match (&self.notification, id) {
            (Some(current), Some(id)) => current.id == id,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if matches {
            self.notification = None;
            self.mark_dirty();
        }
        matches
    }
}
