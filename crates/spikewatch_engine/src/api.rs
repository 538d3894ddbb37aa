use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spikewatch_core::{AnalysisResult, JobId, JobSnapshot};
use url::Url;

use crate::{ApiError, EngineError, FailureKind};

/// Fixed period between two status requests of one job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root of the analysis server, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// The three endpoints of the analysis server.
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /analyze/start`.
    async fn start_job(&self, url: &str, keyword: Option<&str>) -> Result<JobId, ApiError>;

    /// `GET /analyze/status/{job_id}`.
    async fn job_status(&self, job_id: &JobId) -> Result<JobSnapshot, ApiError>;

    /// `POST /analyze/recompute/{job_id}`.
    async fn recompute(&self, job_id: &JobId, keyword: &str) -> Result<AnalysisResult, ApiError>;
}

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    job_id: JobId,
}

#[derive(Debug, Serialize)]
struct RecomputeRequest<'a> {
    keyword: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecomputeResponse {
    result: AnalysisResult,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestAnalysisApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, EngineError> {
        let mut base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::UnsupportedBaseUrl(settings.base_url.clone()));
        }
        // Endpoints are joined relative to the base, so keep its path a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str, job_id: Option<&JobId>) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if let Some(job_id) = job_id {
            url.path_segments_mut()
                .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "url cannot be a base"))?
                .pop_if_empty()
                .push(job_id.as_str());
        }
        Ok(url)
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let server_message = server_error_message(&bytes);
            engine_warn!(
                "Server answered {} ({})",
                status,
                server_message.as_deref().unwrap_or("no error message")
            );
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .with_server_message(server_message));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl AnalysisApi for ReqwestAnalysisApi {
    async fn start_job(&self, url: &str, keyword: Option<&str>) -> Result<JobId, ApiError> {
        let endpoint = self.endpoint("analyze/start", None)?;
        engine_debug!("POST {}", endpoint);
        let response: StartResponse = self
            .post_json(endpoint, &StartRequest { url, keyword })
            .await?;
        Ok(response.job_id)
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobSnapshot, ApiError> {
        let endpoint = self.endpoint("analyze/status/", Some(job_id))?;
        engine_debug!("GET {}", endpoint);
        self.send(self.client.get(endpoint)).await
    }

    async fn recompute(&self, job_id: &JobId, keyword: &str) -> Result<AnalysisResult, ApiError> {
        let endpoint = self.endpoint("analyze/recompute/", Some(job_id))?;
        engine_debug!("POST {}", endpoint);
        let response: RecomputeResponse = self
            .post_json(endpoint, &RecomputeRequest { keyword })
            .await?;
        Ok(response.result)
    }
}

fn server_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
