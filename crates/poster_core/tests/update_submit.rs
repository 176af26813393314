mod common;

use common::{accepted, init_logging, submit};
use poster_core::{
    messages, update, AppState, Effect, JobId, JobParams, LifecycleState, Msg, SubmitOutcome,
};
use pretty_assertions::assert_eq;

#[test]
fn blank_place_never_submits() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "   ");

    assert!(effects.is_empty());
    assert!(!state.is_submitting());
    assert!(!state.view().can_submit);
    assert_eq!(state.view().state, LifecycleState::Idle);
}

#[test]
fn generate_emits_submit_with_form_params() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "Paris");

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            params: JobParams::with_place("Paris")
        }]
    );
    let view = state.view();
    assert!(view.submitting);
    assert!(!view.can_submit);
    assert_eq!(view.state, LifecycleState::Idle);
}

#[test]
fn second_click_while_submitting_is_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Paris");
    let (state, effects) = update(state, Msg::GenerateClicked);

    assert!(effects.is_empty());
    assert!(state.is_submitting());
}

#[test]
fn accepted_enters_generating_and_starts_polling_once() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Paris");
    let (mut state, effects) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Accepted {
            job_id: JobId::new("J1"),
            estimated_seconds: 50,
        }),
    );

    let starts: Vec<_> = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::StartPolling { .. }))
        .collect();
    assert_eq!(starts.len(), 1);
    assert!(matches!(
        &effects[0],
        Effect::StartPolling { job_id, .. } if job_id == &JobId::new("J1")
    ));

    let view = state.view();
    assert_eq!(view.state, LifecycleState::Generating);
    assert_eq!(view.job_id, Some(JobId::new("J1")));
    assert_eq!(view.estimated_seconds, Some(50));
    assert_eq!(view.progress_message, Some("Preparing your poster..."));
    assert!(!view.submitting);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn rate_limited_creates_no_job_and_no_scheduler() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Paris");
    let (state, effects) = update(state, Msg::SubmitFinished(SubmitOutcome::RateLimited));

    assert!(effects.is_empty());
    assert!(state.job().is_none());
    assert!(state.active_ticket().is_none());
    let view = state.view();
    assert_eq!(view.state, LifecycleState::RateLimited);
    assert_eq!(view.message.as_deref(), Some(messages::RATE_LIMITED));
}

#[test]
fn rejected_surfaces_server_message_or_fallback() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Paris");
    let (state, _) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Rejected {
            message: "Unknown theme: neon2".to_string(),
        }),
    );
    assert_eq!(state.view().state, LifecycleState::Error);
    assert_eq!(state.view().message.as_deref(), Some("Unknown theme: neon2"));
    assert!(state.job().is_none());

    let (state, _) = submit(AppState::new(), "Paris");
    let (state, _) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Rejected {
            message: String::new(),
        }),
    );
    assert_eq!(
        state.view().message.as_deref(),
        Some(messages::SOMETHING_WENT_WRONG)
    );
}

#[test]
fn unsolicited_submit_result_is_dropped() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::SubmitFinished(SubmitOutcome::Accepted {
            job_id: JobId::new("ghost"),
            estimated_seconds: 10,
        }),
    );
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn form_is_frozen_outside_idle() {
    init_logging();
    let (state, _) = accepted("Paris", "J1");
    let (state, _) = update(state, Msg::FormChanged(JobParams::with_place("Tokyo")));

    assert_eq!(state.form().place, "Paris");
    assert_eq!(state.job().unwrap().params.place, "Paris");
}
