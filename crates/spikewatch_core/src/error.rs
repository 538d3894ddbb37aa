use thiserror::Error;

/// User input rejected before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a stream URL.")]
    EmptyUrl,
    #[error("Analyze a stream URL before running a keyword analysis.")]
    NoCompletedJob,
    #[error("Please enter a keyword.")]
    EmptyKeyword,
}
