use std::sync::Arc;

use poster_core::{messages, JobId, JobParams, SubmitOutcome, ValidationError};
use poster_logging::{poster_info, poster_warn};
use serde_json::Value;

use crate::{GenerateRequestBody, GenerateResponseBody, JobApi, RawResponse};

const TOO_MANY_REQUESTS: u16 = 429;

/// Sends generation requests and classifies the immediate response.
#[derive(Clone)]
pub struct JobSubmitter {
    api: Arc<dyn JobApi>,
}

impl JobSubmitter {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self { api }
    }

    /// Submits `params`. Nothing is sent when the place is blank.
    pub async fn submit(&self, params: &JobParams) -> Result<SubmitOutcome, ValidationError> {
        params.validate()?;
        let body = GenerateRequestBody::from(params);

        let outcome = match self.api.submit(&body).await {
            Ok(response) => classify_submit_response(&response),
            Err(err) => {
                poster_warn!("Submission for {:?} did not complete: {}", body.city, err);
                SubmitOutcome::Rejected {
                    message: messages::SOMETHING_WENT_WRONG.to_string(),
                }
            }
        };
        poster_info!("Submission for {:?} classified as {:?}", body.city, outcome);
        Ok(outcome)
    }
}

pub fn classify_submit_response(response: &RawResponse) -> SubmitOutcome {
    if response.status == TOO_MANY_REQUESTS {
        return SubmitOutcome::RateLimited;
    }
    if (200..300).contains(&response.status) {
        return match serde_json::from_slice::<GenerateResponseBody>(&response.body) {
            Ok(body) => SubmitOutcome::Accepted {
                job_id: JobId::new(body.job_id),
                estimated_seconds: body.estimated_seconds,
            },
            Err(err) => {
                poster_warn!("Accepted submission had an unreadable body: {}", err);
                SubmitOutcome::Rejected {
                    message: messages::SOMETHING_WENT_WRONG.to_string(),
                }
            }
        };
    }
    SubmitOutcome::Rejected {
        message: extract_detail(&response.body)
            .unwrap_or_else(|| messages::SOMETHING_WENT_WRONG.to_string()),
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Accepts `{"detail": "text"}`, `{"detail": {"detail": "text"}}` and
/// `{"detail": [{"msg": "text"}, ...]}`.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let detail = value.get("detail")?;
    let text = match detail {
        Value::String(text) => Some(text.as_str()),
        Value::Object(inner) => inner.get("detail").and_then(Value::as_str),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str),
        _ => None,
    }?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
