use poster_core::{
    JobParams, NotificationId, PollOutcome, PollTicket, RemoteStatus, StatusSnapshot,
    SubmitOutcome, MAX_LANDMARKS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything the engine reports back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmitFinished(SubmitOutcome),
    PollProgress {
        ticket: PollTicket,
        snapshot: StatusSnapshot,
    },
    PollFinished {
        ticket: PollTicket,
        outcome: PollOutcome,
    },
    NotificationExpired {
        id: NotificationId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkBody {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequestBody {
    pub city: String,
    pub country: String,
    pub theme: String,
    pub distance: u32,
    pub email: Option<String>,
    pub output_format: String,
    pub custom_title: String,
    pub landmarks: Vec<LandmarkBody>,
}

impl From<&JobParams> for GenerateRequestBody {
    fn from(params: &JobParams) -> Self {
        let email = params.email.trim();
        Self {
            city: params.place.trim().to_string(),
            country: params.country.trim().to_string(),
            theme: params.theme.clone(),
            distance: params.distance,
            email: (!email.is_empty()).then(|| email.to_string()),
            output_format: params.output_format.clone(),
            custom_title: params.custom_title.trim().to_string(),
            landmarks: params
                .landmarks
                .iter()
                .take(MAX_LANDMARKS)
                .map(|landmark| LandmarkBody {
                    name: landmark.name.clone(),
                    lat: landmark.lat,
                    lon: landmark.lon,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateResponseBody {
    pub job_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub estimated_seconds: u32,
}

/// Body of `GET /api/status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponseBody {
    #[serde(default)]
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl StatusResponseBody {
    pub fn into_snapshot(self) -> StatusSnapshot {
        StatusSnapshot {
            status: RemoteStatus::parse(&self.status),
            stage: self.stage,
            artifact: self.poster_url,
            failure_reason: self.error_message,
        }
    }
}
