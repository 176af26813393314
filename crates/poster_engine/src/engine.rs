use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use poster_core::{
    JobId, JobParams, NotificationId, PollOutcome, PollPolicy, PollTicket, StatusSnapshot,
    SubmitOutcome,
};
use poster_logging::{poster_error, poster_info, poster_warn};
use tokio::sync::mpsc as async_mpsc;
use tokio::task::JoinHandle;

use crate::notify::NotificationTimer;
use crate::poller::{PollSink, PollingScheduler, Sleeper, TokioSleeper};
use crate::{ApiError, ClientSettings, EngineEvent, JobApi, JobSubmitter, ReqwestJobApi};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub client: ClientSettings,
    pub poll: PollPolicy,
    pub notification_duration: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            poll: PollPolicy::default(),
            notification_duration: Duration::from_millis(5_000),
        }
    }
}

enum EngineCommand {
    Submit { params: JobParams },
    StartPolling { ticket: PollTicket, job_id: JobId },
    StopPolling,
    ScheduleDismiss { id: NotificationId },
    CancelDismiss,
    Shutdown,
}

/// Runs submissions, polling and timers on a dedicated worker thread.
///
/// The worker hosts a single-threaded runtime, so no two engine operations
/// run in parallel. Dropping the handle shuts the worker down, cancelling
/// any polling run and pending notification timer.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestJobApi::new(&settings.client)?);
        Ok(Self::with_parts(api, Arc::new(TokioSleeper), settings))
    }

    pub fn with_parts(
        api: Arc<dyn JobApi>,
        sleeper: Arc<dyn Sleeper>,
        settings: EngineSettings,
    ) -> Self {
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");
            let worker = Worker::new(api, sleeper, settings, event_tx);
            runtime.block_on(worker.run(cmd_rx));
        });

        Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        }
    }

    pub fn submit(&self, params: JobParams) {
        self.send(EngineCommand::Submit { params });
    }

    pub fn start_polling(&self, ticket: PollTicket, job_id: JobId) {
        self.send(EngineCommand::StartPolling { ticket, job_id });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub fn schedule_dismiss(&self, id: NotificationId) {
        self.send(EngineCommand::ScheduleDismiss { id });
    }

    pub fn cancel_dismiss(&self) {
        self.send(EngineCommand::CancelDismiss);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops the worker and waits for it to exit.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.send(EngineCommand::Shutdown);
            if worker.join().is_err() {
                poster_error!("Engine worker panicked");
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            poster_warn!("Engine worker is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    submitter: JobSubmitter,
    scheduler: PollingScheduler,
    notifications: NotificationTimer,
    notification_duration: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
    submissions: Vec<JoinHandle<()>>,
}

impl Worker {
    fn new(
        api: Arc<dyn JobApi>,
        sleeper: Arc<dyn Sleeper>,
        settings: EngineSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        Self {
            submitter: JobSubmitter::new(api.clone()),
            scheduler: PollingScheduler::new(api, sleeper.clone(), settings.poll),
            notifications: NotificationTimer::new(sleeper),
            notification_duration: settings.notification_duration,
            event_tx,
            submissions: Vec::new(),
        }
    }

    async fn run(mut self, mut cmd_rx: async_mpsc::UnboundedReceiver<EngineCommand>) {
        while let Some(command) = cmd_rx.recv().await {
            match command {
                EngineCommand::Submit { params } => self.submit(params),
                EngineCommand::StartPolling { ticket, job_id } => {
                    let sink = Arc::new(ChannelPollSink {
                        ticket,
                        tx: self.event_tx.clone(),
                    });
                    if let Err(err) = self.scheduler.start(job_id, sink) {
                        poster_error!("Cannot start polling for ticket {:?}: {}", ticket, err);
                    }
                }
                EngineCommand::StopPolling => self.scheduler.stop(),
                EngineCommand::ScheduleDismiss { id } => {
                    let tx = self.event_tx.clone();
                    self.notifications
                        .schedule(id, self.notification_duration, move |id| {
                            let _ = tx.send(EngineEvent::NotificationExpired { id });
                        });
                }
                EngineCommand::CancelDismiss => self.notifications.cancel(),
                EngineCommand::Shutdown => break,
            }
        }

        poster_info!("Engine worker shutting down");
        self.scheduler.stop();
        self.notifications.cancel();
        for submission in self.submissions.drain(..) {
            submission.abort();
        }
    }

    fn submit(&mut self, params: JobParams) {
        self.submissions.retain(|task| !task.is_finished());
        let submitter = self.submitter.clone();
        let tx = self.event_tx.clone();
        self.submissions.push(tokio::spawn(async move {
            let outcome = match submitter.submit(&params).await {
                Ok(outcome) => outcome,
                Err(err) => SubmitOutcome::Rejected {
                    message: err.to_string(),
                },
            };
            let _ = tx.send(EngineEvent::SubmitFinished(outcome));
        }));
    }
}

struct ChannelPollSink {
    ticket: PollTicket,
    tx: mpsc::Sender<EngineEvent>,
}

impl PollSink for ChannelPollSink {
    fn on_snapshot(&self, snapshot: StatusSnapshot) {
        let _ = self.tx.send(EngineEvent::PollProgress {
            ticket: self.ticket,
            snapshot,
        });
    }

    fn on_finished(&self, outcome: PollOutcome) {
        let _ = self.tx.send(EngineEvent::PollFinished {
            ticket: self.ticket,
            outcome,
        });
    }
}
