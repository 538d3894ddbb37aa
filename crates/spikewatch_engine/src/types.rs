use std::fmt;

use spikewatch_core::{AnalysisResult, JobId, JobSnapshot, SessionId};
use thiserror::Error;

/// Results of engine work, tagged with the session that requested it.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobStarted {
        session: SessionId,
        result: Result<JobId, ApiError>,
    },
    Status {
        session: SessionId,
        snapshot: JobSnapshot,
    },
    /// Polling for `session` has ended because a status request failed.
    StatusFailed {
        session: SessionId,
        error: ApiError,
    },
    RecomputeFinished {
        session: SessionId,
        keyword: String,
        result: Result<AnalysisResult, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// The `error` field of a failure response body, when the server sent one.
    pub server_message: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
        }
    }

    pub(crate) fn with_server_message(mut self, server_message: Option<String>) -> Self {
        self.server_message = server_message;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid server base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("server base url cannot carry a path: {0}")]
    UnsupportedBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start engine: {0}")]
    Io(#[from] std::io::Error),
}
