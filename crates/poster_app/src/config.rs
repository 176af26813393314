use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use poster_core::PollPolicy;
use poster_engine::{ClientSettings, EngineSettings};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "./poster_client.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub multiplier: f64,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            initial_interval_ms: policy.initial_interval.as_millis() as u64,
            max_interval_ms: policy.max_interval.as_millis() as u64,
            multiplier: policy.multiplier,
            max_attempts: policy.max_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log: LogDestination,
    pub poll: PollConfig,
    pub notification_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            connect_timeout_secs: client.connect_timeout.map(|timeout| timeout.as_secs()),
            request_timeout_secs: None,
            log: LogDestination::default(),
            poll: PollConfig::default(),
            notification_ms: 5_000,
        }
    }
}

impl ClientConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            client: ClientSettings {
                base_url: self.base_url.clone(),
                connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            },
            poll: PollPolicy {
                initial_interval: Duration::from_millis(self.poll.initial_interval_ms),
                max_interval: Duration::from_millis(self.poll.max_interval_ms),
                multiplier: self.poll.multiplier,
                max_attempts: self.poll.max_attempts,
            }
            .normalized(),
            notification_duration: Duration::from_millis(self.notification_ms),
        }
    }
}

/// Reads the config file. A missing file yields `Ok(None)`.
pub fn load(path: &Path) -> anyhow::Result<Option<ClientConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    let config = ron::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(Some(config))
}
