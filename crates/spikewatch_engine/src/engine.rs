use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info};
use spikewatch_core::{AnalysisResult, JobId, SessionId};

use crate::api::{AnalysisApi, ApiSettings, ReqwestAnalysisApi};
use crate::poller::{EventSink, StatusPoller};
use crate::{ApiError, EngineError, EngineEvent, FailureKind};

enum EngineCommand {
    StartJob {
        session: SessionId,
        url: String,
        keyword: Option<String>,
    },
    StartPolling {
        session: SessionId,
        job_id: JobId,
    },
    StopPolling,
    Recompute {
        session: SessionId,
        job_id: JobId,
        keyword: String,
    },
}

/// Front end of the background engine thread.
///
/// Commands are queued on a channel and executed on a tokio runtime owned by
/// the engine thread. Results come back through the [`EventSink`] given at
/// construction. Dropping the handle closes the channel, which stops any
/// running poll and shuts the runtime down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = ReqwestAnalysisApi::new(&settings)?;
        engine_info!("Engine talking to {}", settings.base_url);
        Self::with_api(Arc::new(api), settings.poll_interval, sink)
    }

    pub fn with_api(
        api: Arc<dyn AnalysisApi>,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("spikewatch-engine".to_string())
            .spawn(move || {
                let mut dispatcher = Dispatcher {
                    runtime: runtime.handle().clone(),
                    api,
                    sink,
                    poll_interval,
                    poller: None,
                };
                while let Ok(command) = cmd_rx.recv() {
                    dispatcher.handle(command);
                }
                dispatcher.stop_polling();
                engine_debug!("Engine command channel closed");
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn start_job(&self, session: SessionId, url: impl Into<String>, keyword: Option<String>) {
        self.send(EngineCommand::StartJob {
            session,
            url: url.into(),
            keyword,
        });
    }

    /// Starts polling `job_id`. Any poll already running is stopped first.
    pub fn start_polling(&self, session: SessionId, job_id: JobId) {
        self.send(EngineCommand::StartPolling { session, job_id });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub fn recompute(&self, session: SessionId, job_id: JobId, keyword: impl Into<String>) {
        self.send(EngineCommand::Recompute {
            session,
            job_id,
            keyword: keyword.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine thread is gone; command dropped");
        }
    }
}

struct Dispatcher {
    runtime: tokio::runtime::Handle,
    api: Arc<dyn AnalysisApi>,
    sink: Arc<dyn EventSink>,
    poll_interval: Duration,
    poller: Option<StatusPoller>,
}

impl Dispatcher {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::StartJob {
                session,
                url,
                keyword,
            } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    let result = api.start_job(&url, keyword.as_deref()).await;
                    match &result {
                        Ok(job_id) => engine_info!("Server accepted {} as job {}", url, job_id),
                        Err(err) => engine_error!("Starting analysis of {} failed: {}", url, err),
                    }
                    sink.emit(EngineEvent::JobStarted { session, result });
                });
            }
            EngineCommand::StartPolling { session, job_id } => {
                self.stop_polling();
                self.poller = Some(StatusPoller::spawn(
                    &self.runtime,
                    self.api.clone(),
                    self.sink.clone(),
                    session,
                    job_id,
                    self.poll_interval,
                ));
            }
            EngineCommand::StopPolling => self.stop_polling(),
            EngineCommand::Recompute {
                session,
                job_id,
                keyword,
            } => {
                let api = self.api.clone();
                let guard = RecomputeGuard::new(self.sink.clone(), session, keyword);
                self.runtime.spawn(async move {
                    let result = api.recompute(&job_id, guard.keyword()).await;
                    if let Err(err) = &result {
                        engine_error!("Keyword recompute for job {} failed: {}", job_id, err);
                    }
                    guard.finish(result);
                });
            }
        }
    }

    fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}

/// Makes sure every recompute ends with a [`EngineEvent::RecomputeFinished`],
/// even when its task is dropped before the request returns.
struct RecomputeGuard {
    sink: Arc<dyn EventSink>,
    session: SessionId,
    keyword: String,
    finished: bool,
}

impl RecomputeGuard {
    fn new(sink: Arc<dyn EventSink>, session: SessionId, keyword: String) -> Self {
        Self {
            sink,
            session,
            keyword,
            finished: false,
        }
    }

    fn keyword(&self) -> &str {
        &self.keyword
    }

    fn finish(mut self, result: Result<AnalysisResult, ApiError>) {
        self.finished = true;
        self.sink.emit(EngineEvent::RecomputeFinished {
            session: self.session,
            keyword: std::mem::take(&mut self.keyword),
            result,
        });
    }
}

impl Drop for RecomputeGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.sink.emit(EngineEvent::RecomputeFinished {
            session: self.session,
            keyword: std::mem::take(&mut self.keyword),
            result: Err(ApiError::new(
                FailureKind::Cancelled,
                "recompute task ended before a response arrived",
            )),
        });
    }
}
