//! User-facing status strings.

pub const STARTING: &str = "Starting analysis job...";
pub const COMPLETED: &str = "Analysis of all comments completed.";
pub const START_FAILED: &str = "Failed to start the analysis job.";
pub const JOB_FAILED: &str = "Analysis failed.";
pub const PROGRESS_FETCH_FAILED: &str = "Failed to fetch progress.";
pub const NO_KEYWORD: &str = "No keyword analyzed.";
pub const KEYWORD_RUNNING: &str = "Analyzing keyword...";
pub const RECOMPUTE_FAILED: &str = "Keyword analysis failed.";
pub const NO_SPIKES: &str = "No spikes exceeded the threshold.";
pub const TOTAL_LABEL: &str = "All comments (smoothed)";

pub fn progress(processed: u64, last_timestamp: Option<f64>) -> String {
    let timestamp = last_timestamp
        .map(|seconds| format!("{seconds:.1}s"))
        .unwrap_or_else(|| "-".to_string());
    format!("Analyzing: {processed} messages processed (latest timestamp {timestamp})")
}

pub fn keyword_label(keyword: &str) -> String {
    format!("Keyword ({keyword})")
}

pub fn keyword_results(keyword: &str) -> String {
    format!("Results for \"{keyword}\"")
}
