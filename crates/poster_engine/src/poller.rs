//! Status polling with adaptive backoff.
//!
//! A polling run is an explicit loop: wait for the current interval, issue
//! one status request, classify the response, repeat. Only one request is
//! ever in flight, so snapshots are observed in send order. Every await
//! point races against the run's [`CancellationToken`]; once the token is
//! cancelled the loop emits nothing further.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use poster_core::{classify, JobId, PollAttempt, PollOutcome, PollPolicy, StatusSnapshot, Verdict};
use poster_logging::{poster_debug, poster_info, poster_warn};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::JobApi;

/// Injectable clock for the delay between requests.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Receives the results of a polling run.
pub trait PollSink: Send + Sync {
    /// A non-terminal snapshot.
    fn on_snapshot(&self, snapshot: StatusSnapshot);
    /// The run stopped itself. Called at most once.
    fn on_finished(&self, outcome: PollOutcome);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("a polling run for job {0} is still active")]
    AlreadyRunning(JobId),
}

/// Polls `job_id` until a terminal verdict, a transport error or the attempt ceiling.
///
/// Returns `None` when cancelled; in that case nothing more is sent to `sink`.
pub async fn run_poll_loop(
    api: &dyn JobApi,
    sleeper: &dyn Sleeper,
    policy: PollPolicy,
    job_id: &JobId,
    cancel: &CancellationToken,
    sink: &dyn PollSink,
) -> Option<PollOutcome> {
    let mut attempt = PollAttempt::new(policy);

    loop {
        let delay = attempt.interval();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            _ = sleeper.sleep(delay) => {}
        }

        attempt.record_request();
        poster_debug!(
            "Polling job {} attempt {} after {:?}",
            job_id,
            attempt.count(),
            delay
        );
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            result = api.fetch_status(job_id) => result,
        };
        if cancel.is_cancelled() {
            return None;
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                poster_warn!("Status request for job {} failed: {}", job_id, err);
                let outcome = PollOutcome::TransportError {
                    detail: err.to_string(),
                };
                sink.on_finished(outcome.clone());
                return Some(outcome);
            }
        };

        let outcome = match classify(&snapshot) {
            Verdict::Completed { artifact } => PollOutcome::Completed { artifact, snapshot },
            Verdict::Failed { reason } => PollOutcome::Failed { reason, snapshot },
            Verdict::Pending { .. } => {
                sink.on_snapshot(snapshot);
                if attempt.is_exhausted() {
                    poster_warn!(
                        "Job {} still pending after {} requests; giving up",
                        job_id,
                        attempt.count()
                    );
                    PollOutcome::TimedOut {
                        attempts: attempt.count(),
                    }
                } else {
                    attempt.back_off();
                    continue;
                }
            }
        };

        poster_info!("Polling for job {} finished: {:?}", job_id, outcome);
        sink.on_finished(outcome.clone());
        return Some(outcome);
    }
}

/// Forwards to the caller's sink only while the run is live.
///
/// The cancellation check and the forward happen under `gate`, which
/// [`PollingScheduler::stop`] also takes after cancelling. An emission is
/// either complete before `stop` returns or never happens.
struct GatedSink {
    inner: Arc<dyn PollSink>,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
}

impl GatedSink {
    fn forward(&self, emit: impl FnOnce(&dyn PollSink)) {
        let _guard = self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.cancel.is_cancelled() {
            emit(self.inner.as_ref());
        }
    }
}

impl PollSink for GatedSink {
    fn on_snapshot(&self, snapshot: StatusSnapshot) {
        self.forward(|sink| sink.on_snapshot(snapshot));
    }

    fn on_finished(&self, outcome: PollOutcome) {
        self.forward(|sink| sink.on_finished(outcome));
    }
}

struct ActiveRun {
    job_id: JobId,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    task: JoinHandle<()>,
}

/// Owns at most one polling run and the only handle able to cancel it.
///
/// Once [`stop`](Self::stop) returns, the sink of the stopped run receives
/// no further callbacks. `stop` may block briefly while a callback running
/// on another worker thread completes, so sinks must not call back into the
/// scheduler.
pub struct PollingScheduler {
    api: Arc<dyn JobApi>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
    active: Option<ActiveRun>,
}

impl PollingScheduler {
    pub fn new(api: Arc<dyn JobApi>, sleeper: Arc<dyn Sleeper>, policy: PollPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
            active: None,
        }
    }

    /// Whether a run is still pending (not stopped and not self-stopped).
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| !run.task.is_finished() && !run.cancel.is_cancelled())
    }

    /// Starts polling `job_id` on the current tokio runtime.
    ///
    /// Fails if a previous run is still pending; call [`stop`](Self::stop) first.
    pub fn start(&mut self, job_id: JobId, sink: Arc<dyn PollSink>) -> Result<(), SchedulerError> {
        if let Some(run) = &self.active {
            if self.is_running() {
                return Err(SchedulerError::AlreadyRunning(run.job_id.clone()));
            }
        }
        // A finished run holds no pending timer; release its handle.
        self.stop();

        let cancel = CancellationToken::new();
        let api = self.api.clone();
        let sleeper = self.sleeper.clone();
        let policy = self.policy;
        let gate = Arc::new(Mutex::new(()));
        let sink = GatedSink {
            inner: sink,
            cancel: cancel.clone(),
            gate: gate.clone(),
        };
        let task_cancel = cancel.clone();
        let task_job = job_id.clone();
        let task = tokio::spawn(async move {
            run_poll_loop(
                api.as_ref(),
                sleeper.as_ref(),
                policy,
                &task_job,
                &task_cancel,
                &sink,
            )
            .await;
        });

        poster_info!("Polling started for job {}", job_id);
        self.active = Some(ActiveRun {
            job_id,
            cancel,
            gate,
            task,
        });
        Ok(())
    }

    /// Cancels the pending run, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(run) = self.active.take() {
            if !run.task.is_finished() {
                poster_info!("Polling stopped for job {}", run.job_id);
            }
            run.cancel.cancel();
            drop(run.gate.lock());
            run.task.abort();
        }
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
