use crate::{AnalysisResult, JobId, JobSnapshot, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the stream URL input.
    UrlInputChanged(String),
    /// User edited the keyword input.
    KeywordInputChanged(String),
    /// User clicked Analyze.
    AnalyzeClicked,
    /// User clicked Analyze keyword.
    KeywordAnalyzeClicked,
    /// Server accepted the job.
    JobStarted { session: SessionId, job_id: JobId },
    /// Job creation failed; `message` is the server's error text, if any.
    JobStartFailed {
        session: SessionId,
        message: Option<String>,
    },
    /// A status snapshot arrived from the poller.
    StatusReceived {
        session: SessionId,
        snapshot: JobSnapshot,
    },
    /// A status request failed; polling for the session has ended.
    StatusFetchFailed { session: SessionId },
    RecomputeDone {
        session: SessionId,
        keyword: String,
        result: AnalysisResult,
    },
    RecomputeFailed {
        session: SessionId,
        message: Option<String>,
    },
}
