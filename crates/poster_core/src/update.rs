use poster_logging::{poster_debug, poster_info, poster_warn};

use crate::outcome::messages;
use crate::{AppState, Effect, LifecycleState, Msg, PollOutcome, SubmitOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormChanged(params) => {
            if state.lifecycle() == LifecycleState::Idle && !state.is_submitting() {
                state.set_form(params);
            }
            Vec::new()
        }
        Msg::GenerateClicked => {
            if state.lifecycle() != LifecycleState::Idle || state.is_submitting() {
                return (state, Vec::new());
            }
            if let Err(err) = state.form().validate() {
                poster_debug!("Generate ignored: {}", err);
                return (state, Vec::new());
            }
            let params = state.begin_submit();
            vec![Effect::SubmitJob { params }]
        }
        Msg::SubmitFinished(outcome) => {
            if !state.is_submitting() {
                poster_warn!("Dropping submission result with no submission in flight");
                return (state, Vec::new());
            }
            state.end_submit();
            apply_submit_outcome(&mut state, outcome)
        }
        Msg::PollProgress { ticket, snapshot } => {
            if state.is_active_ticket(ticket) {
                state.record_snapshot(snapshot);
            }
            Vec::new()
        }
        Msg::PollFinished { ticket, outcome } => {
            if !state.is_active_ticket(ticket) {
                return (state, Vec::new());
            }
            apply_poll_outcome(&mut state, outcome)
        }
        Msg::ResetClicked => {
            if !state.lifecycle().is_terminal() {
                return (state, Vec::new());
            }
            let mut effects = Vec::new();
            if state.clear_notification(None) {
                effects.push(Effect::CancelNotification);
            }
            state.return_to_idle(true);
            effects
        }
        Msg::RetryClicked => {
            if state.lifecycle() == LifecycleState::Error {
                state.return_to_idle(false);
            }
            Vec::new()
        }
        Msg::NotificationDismissed => {
            if state.has_notification() {
                state.clear_notification(None);
                vec![Effect::CancelNotification]
            } else {
                Vec::new()
            }
        }
        Msg::NotificationExpired { id } => {
            state.clear_notification(Some(id));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_submit_outcome(state: &mut AppState, outcome: SubmitOutcome) -> Vec<Effect> {
    match outcome {
        SubmitOutcome::Accepted {
            job_id,
            estimated_seconds,
        } => {
            poster_info!("Job {} accepted, estimated {}s", job_id, estimated_seconds);
            let ticket = state.enter_generating(job_id.clone(), estimated_seconds);
            vec![Effect::StartPolling { ticket, job_id }]
        }
        SubmitOutcome::RateLimited => {
            poster_info!("Submission rate limited");
            state.reject_submit(LifecycleState::RateLimited, None);
            Vec::new()
        }
        SubmitOutcome::Rejected { message } => {
            poster_info!("Submission rejected: {}", message);
            let message = if message.trim().is_empty() {
                messages::SOMETHING_WENT_WRONG.to_string()
            } else {
                message
            };
            state.reject_submit(LifecycleState::Error, Some(message));
            Vec::new()
        }
    }
}

fn apply_poll_outcome(state: &mut AppState, outcome: PollOutcome) -> Vec<Effect> {
    // StopPolling always precedes the next state being observed.
    let mut effects = vec![Effect::StopPolling];
    match outcome {
        PollOutcome::Completed { artifact, snapshot } => {
            state.record_snapshot(snapshot);
            let (id, message) = state.complete(artifact);
            effects.push(Effect::ShowNotification { id, message });
        }
        other => {
            let message = other
                .error_message()
                .unwrap_or_else(|| messages::SOMETHING_WENT_WRONG.to_string());
            if let PollOutcome::Failed { snapshot, .. } = &other {
                state.record_snapshot(snapshot.clone());
            }
            poster_info!("Generation ended in error: {:?}", other);
            state.fail_generating(message);
        }
    }
    effects
}
