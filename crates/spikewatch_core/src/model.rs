//! Wire model for the analysis server's job and result payloads.
//!
//! Field names follow the server's JSON exactly. Every collection and
//! optional field tolerates being absent or `null`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque job identifier assigned by the server when a job is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Running,
    Completed,
    Error,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    pub fn is_in_progress(self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

/// One `GET /analyze/status/{job_id}` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub processed_messages: Option<u64>,
    /// Playback position of the newest processed message, in seconds.
    #[serde(default)]
    pub last_timestamp: Option<f64>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result_total: Option<AnalysisResult>,
    #[serde(default)]
    pub result_keyword: Option<AnalysisResult>,
}

impl JobSnapshot {
    pub fn processed(&self) -> u64 {
        self.processed_messages.unwrap_or(0)
    }

    /// The keyword the job was analyzed with, ignoring blank values.
    pub fn analyzed_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub series: Series,
    #[serde(default)]
    pub spikes: Vec<Spike>,
}

/// Per-bucket comment rates. All value sequences are indexed like `time_axis`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Series {
    pub time_axis: Vec<f64>,
    pub total: Vec<f64>,
    pub member: Vec<f64>,
    pub keyword: Vec<f64>,
    pub smoothed_total: Vec<f64>,
    pub smoothed_keyword: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub start_time: f64,
    pub peak_time: f64,
    pub peak_value: f64,
    #[serde(default)]
    pub jump_url: String,
}
