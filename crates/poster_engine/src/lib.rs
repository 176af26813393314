//! Poster engine: remote job API, submission, status polling and timers.
mod client;
mod engine;
mod notify;
mod poller;
mod submit;
mod types;

pub use client::{ClientSettings, JobApi, RawResponse, ReqwestJobApi};
pub use engine::{EngineHandle, EngineSettings};
pub use notify::NotificationTimer;
pub use poller::{run_poll_loop, PollSink, PollingScheduler, SchedulerError, Sleeper, TokioSleeper};
pub use submit::{classify_submit_response, extract_detail, JobSubmitter};
pub use types::{
    ApiError, EngineEvent, GenerateRequestBody, GenerateResponseBody, LandmarkBody,
    StatusResponseBody,
};
