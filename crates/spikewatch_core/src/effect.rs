use crate::{JobId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `POST /analyze/start`.
    StartJob {
        session: SessionId,
        url: String,
        keyword: Option<String>,
    },
    /// Poll `GET /analyze/status/{job_id}` until stopped or terminal.
    StartPolling { session: SessionId, job_id: JobId },
    /// Cancel the active poller, if any.
    StopPolling,
    /// `POST /analyze/recompute/{job_id}`.
    Recompute {
        session: SessionId,
        job_id: JobId,
        keyword: String,
    },
}
