//! Maps raw status snapshots to lifecycle verdicts.

use crate::outcome::messages;

/// Status reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    /// Any value this client does not know about yet.
    Other(String),
}

impl RemoteStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => RemoteStatus::Queued,
            "processing" => RemoteStatus::Processing,
            "completed" => RemoteStatus::Completed,
            "failed" => RemoteStatus::Failed,
            other => RemoteStatus::Other(other.to_string()),
        }
    }
}

/// Most recent status of a job as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: RemoteStatus,
    pub stage: Option<String>,
    pub artifact: Option<String>,
    pub failure_reason: Option<String>,
}

impl StatusSnapshot {
    pub fn new(status: RemoteStatus) -> Self {
        Self {
            status,
            stage: None,
            artifact: None,
            failure_reason: None,
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pending { message: &'static str },
    Completed { artifact: Option<String> },
    Failed { reason: String },
}

impl Verdict {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Verdict::Pending { .. })
    }
}

/// Classifies a snapshot. Unknown statuses stay pending.
pub fn classify(snapshot: &StatusSnapshot) -> Verdict {
    match &snapshot.status {
        RemoteStatus::Completed => Verdict::Completed {
            artifact: snapshot.artifact.clone(),
        },
        RemoteStatus::Failed => Verdict::Failed {
            reason: snapshot
                .failure_reason
                .as_deref()
                .filter(|reason| !reason.trim().is_empty())
                .unwrap_or(messages::GENERATION_FAILED)
                .to_string(),
        },
        RemoteStatus::Queued | RemoteStatus::Processing | RemoteStatus::Other(_) => {
            Verdict::Pending {
                message: stage_message(snapshot.stage.as_deref()),
            }
        }
    }
}

/// User-facing progress line for a remote stage label.
pub fn stage_message(stage: Option<&str>) -> &'static str {
    match stage {
        Some("geocoding") => "Finding your place on the map...",
        Some("fetching_streets") => "Downloading street data...",
        Some("rendering") => "Rendering your poster...",
        Some("sending_email") => "Sending your poster by email...",
        Some("done") => "Finishing up...",
        _ => PREPARING,
    }
}

const PREPARING: &str = "Preparing your poster...";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_carries_artifact() {
        let snapshot =
            StatusSnapshot::new(RemoteStatus::Completed).with_artifact("https://x/J1.png");
        assert_eq!(
            classify(&snapshot),
            Verdict::Completed {
                artifact: Some("https://x/J1.png".to_string())
            }
        );
    }

    #[test]
    fn failed_without_reason_uses_fallback() {
        let verdict = classify(&StatusSnapshot::new(RemoteStatus::Failed));
        assert_eq!(
            verdict,
            Verdict::Failed {
                reason: messages::GENERATION_FAILED.to_string()
            }
        );
        let verdict = classify(
            &StatusSnapshot::new(RemoteStatus::Failed).with_failure_reason("City not found"),
        );
        assert_eq!(
            verdict,
            Verdict::Failed {
                reason: "City not found".to_string()
            }
        );
    }

    #[test]
    fn unknown_status_is_pending() {
        let snapshot = StatusSnapshot::new(RemoteStatus::parse("paused")).with_stage("rendering");
        let verdict = classify(&snapshot);
        assert!(!verdict.is_terminal());
        assert_eq!(
            verdict,
            Verdict::Pending {
                message: "Rendering your poster..."
            }
        );
    }

    #[test]
    fn unrecognized_or_missing_stage_falls_back() {
        assert_eq!(stage_message(None), PREPARING);
        assert_eq!(stage_message(Some("warming_up")), PREPARING);
        assert_eq!(stage_message(Some("geocoding")), "Finding your place on the map...");
    }
}
