#![allow(dead_code)]

use std::sync::Once;

use poster_core::{
    update, AppState, Effect, JobId, JobParams, Msg, PollTicket, SubmitOutcome,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(poster_logging::initialize_for_tests);
}

pub fn submit(state: AppState, place: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::FormChanged(JobParams::with_place(place)));
    update(state, Msg::GenerateClicked)
}

/// Submits `place` and accepts it as `job_id`, returning the ticket of the polling run.
pub fn accepted(place: &str, job_id: &str) -> (AppState, PollTicket) {
    let (state, _) = submit(AppState::new(), place);
    let (state, effects) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Accepted {
            job_id: JobId::new(job_id),
            estimated_seconds: 50,
        }),
    );
    let ticket = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartPolling { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("start polling effect");
    (state, ticket)
}
