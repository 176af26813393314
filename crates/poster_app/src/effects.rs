use std::time::Duration;

use poster_core::{Effect, Msg};
use poster_engine::{EngineEvent, EngineHandle};
use poster_logging::{poster_debug, poster_info};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { params } => {
                    poster_info!(
                        "SubmitJob place={:?} theme={} distance={}",
                        params.place,
                        params.theme,
                        params.distance
                    );
                    self.engine.submit(params);
                }
                Effect::StartPolling { ticket, job_id } => {
                    poster_info!("StartPolling ticket={:?} job_id={}", ticket, job_id);
                    self.engine.start_polling(ticket, job_id);
                }
                Effect::StopPolling => {
                    poster_debug!("StopPolling");
                    self.engine.stop_polling();
                }
                Effect::ShowNotification { id, message } => {
                    poster_info!("ShowNotification {:?}: {}", id, message);
                    self.engine.schedule_dismiss(id);
                }
                Effect::CancelNotification => {
                    poster_debug!("CancelNotification");
                    self.engine.cancel_dismiss();
                }
            }
        }
    }

    /// Waits up to `timeout` for an engine event; `Msg::Tick` when none arrives.
    pub fn next_msg(&self, timeout: Duration) -> Msg {
        self.engine
            .recv_timeout(timeout)
            .map(map_event)
            .unwrap_or(Msg::Tick)
    }

    /// Stops polling and cancels pending timers.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmitFinished(outcome) => Msg::SubmitFinished(outcome),
        EngineEvent::PollProgress { ticket, snapshot } => Msg::PollProgress { ticket, snapshot },
        EngineEvent::PollFinished { ticket, outcome } => Msg::PollFinished { ticket, outcome },
        EngineEvent::NotificationExpired { id } => Msg::NotificationExpired { id },
    }
}
