use std::time::Duration;

use poster_core::{JobId, StatusSnapshot};
use poster_logging::poster_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::{ApiError, GenerateRequestBody, StatusResponseBody};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// `None` leaves connection setup to the platform default.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the whole-request timeout to the platform default.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The two operations the remote job service offers.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// `POST /api/generate`. Any well-formed HTTP response is `Ok`.
    async fn submit(&self, body: &GenerateRequestBody) -> Result<RawResponse, ApiError>;

    /// `GET /api/status/{job_id}`. Non-2xx responses are errors.
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))
    }

    fn status_url(&self, job_id: &JobId) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/status/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(job_id.as_str());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn submit(&self, body: &GenerateRequestBody) -> Result<RawResponse, ApiError> {
        let url = self.endpoint("api/generate")?;
        let payload = serde_json::to_vec(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        poster_debug!("POST {} ({} bytes)", url, payload.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }

    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, ApiError> {
        let url = self.status_url(job_id)?;
        poster_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: StatusResponseBody =
            serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))?;

        let mut snapshot = body.into_snapshot();
        snapshot.artifact = snapshot
            .artifact
            .map(|raw| resolve_artifact(&self.base_url, &raw));
        Ok(snapshot)
    }
}

/// Parses the base URL, forcing a trailing slash so endpoints join beneath it.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim()).map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// The service reports artifacts as server-relative paths; absolute URLs pass through.
fn resolve_artifact(base: &Url, raw: &str) -> String {
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    base.join(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    ApiError::Transport(err.to_string())
}
