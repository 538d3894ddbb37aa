use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use spikewatch_core::{AnalysisResult, JobId, JobSnapshot, JobStatus, Series};
use spikewatch_engine::{
    AnalysisApi, ApiError, ChannelEventSink, EngineEvent, EngineHandle, FailureKind,
};

const POLL: Duration = Duration::from_millis(10);
const WAIT: Duration = Duration::from_secs(5);

/// Jobs named `done-*` complete on their second status request; all others
/// run forever. Recomputing the keyword `boom` fails.
#[derive(Default)]
struct FakeApi {
    polls: Mutex<HashMap<String, u32>>,
}

impl FakeApi {
    fn polls_of(&self, job: &str) -> u32 {
        self.polls.lock().unwrap().get(job).copied().unwrap_or(0)
    }
}

#[async_trait]
impl AnalysisApi for FakeApi {
    async fn start_job(&self, url: &str, keyword: Option<&str>) -> Result<JobId, ApiError> {
        if url.is_empty() {
            return Err(ApiError {
                kind: FailureKind::HttpStatus(400),
                message: "400 Bad Request".to_string(),
                server_message: Some("url is required".to_string()),
            });
        }
        Ok(JobId::new(format!("job-{}", keyword.unwrap_or("plain"))))
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobSnapshot, ApiError> {
        let count = {
            let mut polls = self.polls.lock().unwrap();
            let count = polls.entry(job_id.as_str().to_string()).or_insert(0);
            *count += 1;
            *count
        };
        let status = if job_id.as_str().starts_with("done-") && count >= 2 {
            JobStatus::Completed
        } else {
            JobStatus::Running
        };
        Ok(JobSnapshot {
            job_id: Some(job_id.clone()),
            status,
            processed_messages: Some(u64::from(count)),
            ..JobSnapshot::default()
        })
    }

    async fn recompute(&self, _job_id: &JobId, keyword: &str) -> Result<AnalysisResult, ApiError> {
        if keyword == "boom" {
            return Err(ApiError {
                kind: FailureKind::HttpStatus(500),
                message: "500 Internal Server Error".to_string(),
                server_message: None,
            });
        }
        Ok(AnalysisResult {
            series: Series {
                time_axis: vec![0.0, 1.0],
                keyword: vec![0.0, 2.0],
                ..Series::default()
            },
            spikes: Vec::new(),
        })
    }
}

fn engine() -> (EngineHandle, Arc<FakeApi>, mpsc::Receiver<EngineEvent>) {
    engine_logging::initialize_for_tests();
    let api = Arc::new(FakeApi::default());
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::with_api(api.clone(), POLL, Arc::new(ChannelEventSink::new(tx)))
        .expect("engine starts");
    (engine, api, rx)
}

fn drain(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    rx.try_iter().collect()
}

#[test]
fn start_job_reports_job_id_for_session() {
    let (engine, _api, rx) = engine();
    engine.start_job(7, "https://youtu.be/x", Some("goal".to_string()));

    match rx.recv_timeout(WAIT).expect("event") {
        EngineEvent::JobStarted { session, result } => {
            assert_eq!(session, 7);
            assert_eq!(result.unwrap(), JobId::new("job-goal"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn start_job_failure_is_reported() {
    let (engine, _api, rx) = engine();
    engine.start_job(1, "", None);

    match rx.recv_timeout(WAIT).expect("event") {
        EngineEvent::JobStarted { result, .. } => {
            let err = result.unwrap_err();
            assert_eq!(err.server_message.as_deref(), Some("url is required"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn polling_runs_until_terminal_status() {
    let (engine, api, rx) = engine();
    engine.start_polling(2, JobId::new("done-a"));

    let first = rx.recv_timeout(WAIT).expect("first status");
    let second = rx.recv_timeout(WAIT).expect("second status");
    let statuses: Vec<JobStatus> = [first, second]
        .into_iter()
        .map(|event| match event {
            EngineEvent::Status { session, snapshot } => {
                assert_eq!(session, 2);
                snapshot.status
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(statuses, vec![JobStatus::Running, JobStatus::Completed]);

    std::thread::sleep(POLL * 10);
    assert!(drain(&rx).is_empty());
    assert_eq!(api.polls_of("done-a"), 2);
}

#[test]
fn new_poll_replaces_the_running_one() {
    let (engine, api, rx) = engine();
    engine.start_polling(1, JobId::new("forever"));
    assert!(matches!(
        rx.recv_timeout(WAIT).expect("status"),
        EngineEvent::Status { session: 1, .. }
    ));

    engine.start_polling(2, JobId::new("done-b"));
    loop {
        match rx.recv_timeout(WAIT).expect("status") {
            EngineEvent::Status { session: 2, snapshot } if snapshot.status.is_terminal() => break,
            EngineEvent::Status { .. } => {}
            other => panic!("unexpected event {other:?}"),
        }
    }

    let before = api.polls_of("forever");
    std::thread::sleep(POLL * 10);
    assert_eq!(api.polls_of("forever"), before);
    assert!(drain(&rx).is_empty());
}

#[test]
fn stop_polling_halts_requests() {
    let (engine, api, rx) = engine();
    engine.start_polling(1, JobId::new("forever"));
    rx.recv_timeout(WAIT).expect("status");

    engine.stop_polling();
    engine.stop_polling();
    std::thread::sleep(POLL * 5);
    drain(&rx);
    let before = api.polls_of("forever");

    std::thread::sleep(POLL * 10);
    assert_eq!(api.polls_of("forever"), before);
    assert!(drain(&rx).is_empty());
}

#[test]
fn recompute_reports_result_and_failure() {
    let (engine, _api, rx) = engine();

    engine.recompute(3, JobId::new("j"), "goal");
    match rx.recv_timeout(WAIT).expect("event") {
        EngineEvent::RecomputeFinished {
            session,
            keyword,
            result,
        } => {
            assert_eq!(session, 3);
            assert_eq!(keyword, "goal");
            assert_eq!(result.unwrap().series.keyword, vec![0.0, 2.0]);
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.recompute(3, JobId::new("j"), "boom");
    match rx.recv_timeout(WAIT).expect("event") {
        EngineEvent::RecomputeFinished { keyword, result, .. } => {
            assert_eq!(keyword, "boom");
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn rejects_invalid_base_url() {
    let (tx, _rx) = mpsc::channel();
    let settings = spikewatch_engine::ApiSettings {
        base_url: "::not a url::".to_string(),
        ..Default::default()
    };
    assert!(EngineHandle::new(settings, Arc::new(ChannelEventSink::new(tx))).is_err());
}
