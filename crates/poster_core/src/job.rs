use std::fmt;

use thiserror::Error;

/// Upper bound on landmarks the remote service accepts per job.
pub const MAX_LANDMARKS: usize = 5;

/// Opaque job identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
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

#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Submission parameters as edited in the form.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParams {
    pub place: String,
    pub country: String,
    pub theme: String,
    /// Radius in metres.
    pub distance: u32,
    pub email: String,
    pub output_format: String,
    pub custom_title: String,
    pub landmarks: Vec<Landmark>,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            place: String::new(),
            country: String::new(),
            theme: "default".to_string(),
            distance: 10_000,
            email: String::new(),
            output_format: "instagram".to_string(),
            custom_title: String::new(),
            landmarks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a place name is required")]
    MissingPlace,
}

impl JobParams {
    pub fn with_place(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            ..Self::default()
        }
    }

    /// Gate applied before any submission is attempted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.place.trim().is_empty() {
            return Err(ValidationError::MissingPlace);
        }
        Ok(())
    }
}

/// A job accepted by the remote service. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub params: JobParams,
    /// Server-side estimate, display only.
    pub estimated_seconds: u32,
}
