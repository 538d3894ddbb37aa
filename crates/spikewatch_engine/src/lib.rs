//! Spikewatch engine: HTTP client, status polling and effect execution.
mod api;
mod engine;
mod poller;
mod types;

pub use api::{AnalysisApi, ApiSettings, ReqwestAnalysisApi, DEFAULT_POLL_INTERVAL};
pub use engine::EngineHandle;
pub use poller::{poll_until_terminal, ChannelEventSink, EventSink, PollOutcome, StatusPoller};
pub use types::{ApiError, EngineError, EngineEvent, FailureKind};
