use std::sync::{mpsc, Arc};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use spikewatch_core::{JobId, SessionId};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{AnalysisApi, EngineEvent};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A `completed` or `error` snapshot was emitted.
    Terminal,
    /// A status request failed and the failure was emitted.
    Failed,
    /// The token was cancelled; nothing further was emitted.
    Stopped,
}

/// Polls one job until it is terminal, a request fails, or `token` is cancelled.
///
/// The first request goes out immediately, the next ones every `period`.
/// Requests are sequential, so snapshots are emitted in the order they were
/// requested. A request already in flight when the token is cancelled is
/// allowed to finish, but its response is dropped.
pub async fn poll_until_terminal(
    api: &dyn AnalysisApi,
    sink: &dyn EventSink,
    session: SessionId,
    job_id: &JobId,
    period: Duration,
    token: &CancellationToken,
) -> PollOutcome {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return PollOutcome::Stopped,
            _ = ticker.tick() => {}
        }

        let result = api.job_status(job_id).await;
        if token.is_cancelled() {
            engine_debug!("Dropping status response for stopped poll of job {}", job_id);
            return PollOutcome::Stopped;
        }

        match result {
            Ok(snapshot) => {
                let status = snapshot.status;
                engine_debug!("Job {} status {:?}", job_id, status);
                sink.emit(EngineEvent::Status { session, snapshot });
                if status.is_terminal() {
                    return PollOutcome::Terminal;
                }
            }
            Err(error) => {
                engine_warn!("Status request for job {} failed: {}", job_id, error);
                sink.emit(EngineEvent::StatusFailed { session, error });
                return PollOutcome::Failed;
            }
        }
    }
}

/// Handle to a polling task. Stopping is idempotent and also happens on drop.
pub struct StatusPoller {
    job_id: JobId,
    token: CancellationToken,
}

impl StatusPoller {
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        api: Arc<dyn AnalysisApi>,
        sink: Arc<dyn EventSink>,
        session: SessionId,
        job_id: JobId,
        period: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_job_id = job_id.clone();
        engine_info!("Polling job {} every {:?}", job_id, period);
        runtime.spawn(async move {
            let outcome = poll_until_terminal(
                api.as_ref(),
                sink.as_ref(),
                session,
                &task_job_id,
                period,
                &task_token,
            )
            .await;
            engine_debug!("Poll of job {} ended: {:?}", task_job_id, outcome);
        });
        Self { job_id, token }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            engine_info!("Stopping poll of job {}", self.job_id);
            self.token.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
