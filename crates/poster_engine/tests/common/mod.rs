#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use poster_core::{JobId, PollOutcome, RemoteStatus, StatusSnapshot};
use poster_engine::{ApiError, GenerateRequestBody, JobApi, PollSink, RawResponse, Sleeper};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(poster_logging::initialize_for_tests);
}

pub fn pending(stage: &str) -> Result<StatusSnapshot, ApiError> {
    Ok(StatusSnapshot::new(RemoteStatus::Processing).with_stage(stage))
}

/// Fake clock: records each requested delay and returns at once.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Clock that never fires.
pub struct FrozenSleeper;

#[async_trait::async_trait]
impl Sleeper for FrozenSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}

/// Replays scripted status responses, then repeats `fallback` forever.
pub struct ScriptedApi {
    responses: Mutex<VecDeque<Result<StatusSnapshot, ApiError>>>,
    fallback: Result<StatusSnapshot, ApiError>,
    calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new(
        responses: Vec<Result<StatusSnapshot, ApiError>>,
        fallback: Result<StatusSnapshot, ApiError>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JobApi for ScriptedApi {
    async fn submit(&self, _body: &GenerateRequestBody) -> Result<RawResponse, ApiError> {
        Ok(RawResponse {
            status: 200,
            body: br#"{"job_id":"J1","status":"queued","estimated_seconds":50}"#.to_vec(),
        })
    }

    async fn fetch_status(&self, _job_id: &JobId) -> Result<StatusSnapshot, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Status request that never completes.
#[derive(Default)]
pub struct HangingApi {
    calls: AtomicUsize,
}

impl HangingApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JobApi for HangingApi {
    async fn submit(&self, _body: &GenerateRequestBody) -> Result<RawResponse, ApiError> {
        std::future::pending().await
    }

    async fn fetch_status(&self, _job_id: &JobId) -> Result<StatusSnapshot, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Snapshot(StatusSnapshot),
    Finished(PollOutcome),
}

#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PollSink for CollectingSink {
    fn on_snapshot(&self, snapshot: StatusSnapshot) {
        self.events.lock().unwrap().push(SinkEvent::Snapshot(snapshot));
    }

    fn on_finished(&self, outcome: PollOutcome) {
        self.events.lock().unwrap().push(SinkEvent::Finished(outcome));
    }
}
