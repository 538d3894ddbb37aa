use engine_logging::{engine_debug, engine_info};

use crate::chart::ChartSlot;
use crate::presenter::{present_keyword, present_total};
use crate::{text, AppState, Effect, JobSnapshot, JobStatus, Msg, Phase, SessionId, ValidationError};

/// Pure update function: applies a message to state and returns any effects.
///
/// Responses carry the session they were issued for. A response whose session
/// is no longer current, or that arrives after its flow has ended, is dropped
/// without touching state.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlInputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::KeywordInputChanged(text) => {
            state.set_keyword_input(text);
            Vec::new()
        }
        Msg::AnalyzeClicked => start_analysis(&mut state),
        Msg::KeywordAnalyzeClicked => recompute_keyword(&mut state),
        Msg::JobStarted { session, job_id } => {
            if !state.is_current(session, Phase::Starting) {
                engine_debug!("Ignoring job start for stale session {}", session);
                return (state, Vec::new());
            }
            engine_info!("Job {} created for session {}", job_id, session);
            state.begin_polling(job_id.clone());
            vec![Effect::StartPolling { session, job_id }]
        }
        Msg::JobStartFailed { session, message } => {
            if !state.is_current(session, Phase::Starting) {
                engine_debug!("Ignoring job start failure for stale session {}", session);
                return (state, Vec::new());
            }
            state.fail(message.unwrap_or_else(|| text::START_FAILED.to_string()));
            Vec::new()
        }
        Msg::StatusReceived { session, snapshot } => handle_status(&mut state, session, snapshot),
        Msg::StatusFetchFailed { session } => {
            if !state.is_current(session, Phase::Polling) {
                engine_debug!("Ignoring fetch failure for stale session {}", session);
                return (state, Vec::new());
            }
            state.fail(text::PROGRESS_FETCH_FAILED.to_string());
            vec![Effect::StopPolling]
        }
        Msg::RecomputeDone {
            session,
            keyword,
            result,
        } => {
            if session != state.session() {
                engine_debug!("Ignoring keyword result for stale session {}", session);
                return (state, Vec::new());
            }
            state.release_keyword_busy();
            state.present(ChartSlot::Keyword, present_keyword(&result, &keyword));
            state.set_keyword_status(text::keyword_results(&keyword));
            Vec::new()
        }
        Msg::RecomputeFailed { session, message } => {
            if session != state.session() {
                engine_debug!("Ignoring keyword failure for stale session {}", session);
                return (state, Vec::new());
            }
            state.release_keyword_busy();
            state.set_keyword_status(message.unwrap_or_else(|| text::RECOMPUTE_FAILED.to_string()));
            Vec::new()
        }
    };

    (state, effects)
}

fn start_analysis(state: &mut AppState) -> Vec<Effect> {
    if !state.analyze_enabled() {
        engine_debug!("Analyze clicked while disabled");
        return Vec::new();
    }
    let url = state.url_input().trim().to_string();
    if url.is_empty() {
        state.raise_alert(ValidationError::EmptyUrl.to_string());
        return Vec::new();
    }
    let keyword = non_blank(state.keyword_input());

    let session = state.begin_session();
    engine_info!("Starting analysis session {} for {}", session, url);
    vec![
        Effect::StopPolling,
        Effect::StartJob {
            session,
            url,
            keyword,
        },
    ]
}

fn handle_status(state: &mut AppState, session: SessionId, snapshot: JobSnapshot) -> Vec<Effect> {
    if !state.is_current(session, Phase::Polling) {
        engine_debug!(
            "Ignoring {:?} snapshot for stale session {}",
            snapshot.status,
            session
        );
        return Vec::new();
    }

    match snapshot.status {
        JobStatus::Queued | JobStatus::Running => {
            state.apply_progress(snapshot.processed(), snapshot.last_timestamp);
            Vec::new()
        }
        JobStatus::Completed => {
            let job_id = snapshot.job_id.clone().or_else(|| state.active_job().cloned());
            state.complete(job_id);
            if let Some(result) = &snapshot.result_total {
                state.present(ChartSlot::Total, present_total(result));
            }
            match (&snapshot.result_keyword, snapshot.analyzed_keyword()) {
                (Some(result), Some(keyword)) => {
                    state.present(ChartSlot::Keyword, present_keyword(result, keyword));
                    state.set_keyword_status(text::keyword_results(keyword));
                }
                _ => state.set_keyword_status(text::NO_KEYWORD.to_string()),
            }
            vec![Effect::StopPolling]
        }
        JobStatus::Error => {
            let message = snapshot
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| text::JOB_FAILED.to_string());
            state.fail(message);
            vec![Effect::StopPolling]
        }
        JobStatus::Unknown => Vec::new(),
    }
}

fn recompute_keyword(state: &mut AppState) -> Vec<Effect> {
    if !state.keyword_control_enabled() {
        engine_debug!("Keyword analyze clicked while disabled");
        return Vec::new();
    }
    let Some(job_id) = state.completed_job().cloned() else {
        state.set_keyword_status(ValidationError::NoCompletedJob.to_string());
        return Vec::new();
    };
    let Some(keyword) = non_blank(state.keyword_input()) else {
        state.set_keyword_status(ValidationError::EmptyKeyword.to_string());
        return Vec::new();
    };

    state.acquire_keyword_busy();
    vec![Effect::Recompute {
        session: state.session(),
        job_id,
        keyword,
    }]
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
