use std::sync::mpsc;

use engine_logging::{engine_info, engine_warn};
use spikewatch_core::{Effect, Msg};
use spikewatch_engine::{ApiSettings, EngineError, EngineEvent, EngineHandle, EventSink};

use super::app::AppInput;

/// Executes effects on the engine and feeds engine results back as [`Msg`]s.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings, input_tx: mpsc::Sender<AppInput>) -> Result<Self, EngineError> {
        let sink = MsgSink { input_tx };
        let engine = EngineHandle::new(settings, std::sync::Arc::new(sink))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob {
                    session,
                    url,
                    keyword,
                } => {
                    engine_info!(
                        "StartJob session={} url={} keyword={:?}",
                        session,
                        url,
                        keyword
                    );
                    self.engine.start_job(session, url, keyword);
                }
                Effect::StartPolling { session, job_id } => {
                    self.engine.start_polling(session, job_id);
                }
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::Recompute {
                    session,
                    job_id,
                    keyword,
                } => {
                    engine_info!("Recompute session={} job={} keyword={}", session, job_id, keyword);
                    self.engine.recompute(session, job_id, keyword);
                }
            }
        }
    }
}

struct MsgSink {
    input_tx: mpsc::Sender<AppInput>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.input_tx.send(AppInput::Msg(event_to_msg(event)));
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobStarted { session, result } => match result {
            Ok(job_id) => Msg::JobStarted { session, job_id },
            Err(err) => {
                engine_warn!("Job start for session {} failed: {}", session, err);
                Msg::JobStartFailed {
                    session,
                    message: err.server_message,
                }
            }
        },
        EngineEvent::Status { session, snapshot } => Msg::StatusReceived { session, snapshot },
        EngineEvent::StatusFailed { session, error } => {
            engine_warn!("Status polling for session {} failed: {}", session, error);
            Msg::StatusFetchFailed { session }
        }
        EngineEvent::RecomputeFinished {
            session,
            keyword,
            result,
        } => match result {
            Ok(result) => Msg::RecomputeDone {
                session,
                keyword,
                result,
            },
            Err(err) => {
                engine_warn!("Recompute of {:?} failed: {}", keyword, err);
                Msg::RecomputeFailed {
                    session,
                    message: err.server_message,
                }
            }
        },
    }
}
