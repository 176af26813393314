use crate::{JobId, StatusSnapshot};

/// User-facing message strings.
pub mod messages {
    pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
    pub const GENERATION_FAILED: &str =
        "Generation failed. Try again with a different input or smaller scope.";
    pub const LOST_CONNECTION: &str = "Lost connection to server";
    pub const TIMED_OUT: &str = "Generation timed out. Try a smaller distance or a simpler request.";
    pub const RATE_LIMITED: &str = "You have reached the daily limit. Please come back tomorrow.";
}

/// Classified response to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        job_id: JobId,
        estimated_seconds: u32,
    },
    RateLimited,
    Rejected {
        message: String,
    },
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed {
        artifact: Option<String>,
        snapshot: StatusSnapshot,
    },
    Failed {
        reason: String,
        snapshot: StatusSnapshot,
    },
    TimedOut {
        attempts: u32,
    },
    TransportError {
        detail: String,
    },
}

impl PollOutcome {
    /// Message shown in the error state, if this outcome is an error.
    pub fn error_message(&self) -> Option<String> {
        match self {
            PollOutcome::Completed { .. } => None,
            PollOutcome::Failed { reason, .. } => Some(reason.clone()),
            PollOutcome::TimedOut { .. } => Some(messages::TIMED_OUT.to_string()),
            PollOutcome::TransportError { .. } => Some(messages::LOST_CONNECTION.to_string()),
        }
    }
}
