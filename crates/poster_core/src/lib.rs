//! Poster core: pure job lifecycle state machine and view-model helpers.
mod backoff;
mod effect;
mod job;
mod msg;
mod outcome;
mod state;
mod status;
mod update;
mod view_model;

pub use backoff::{PollAttempt, PollPolicy};
pub use effect::Effect;
pub use job::{Job, JobId, JobParams, Landmark, ValidationError, MAX_LANDMARKS};
pub use msg::Msg;
pub use outcome::{messages, PollOutcome, SubmitOutcome};
pub use state::{AppState, LifecycleState, NotificationId, PollTicket};
pub use status::{classify, stage_message, RemoteStatus, StatusSnapshot, Verdict};
pub use update::update;
pub use view_model::{AppViewModel, NotificationView};
