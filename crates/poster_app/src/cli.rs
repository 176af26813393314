use std::path::PathBuf;

use clap::Parser;
use poster_core::{JobParams, Landmark};

use crate::config::ClientConfig;
use crate::logging::LogDestination;

/// Generate a map poster and follow the job until it finishes.
#[derive(Debug, Parser)]
#[command(name = "poster_app", version)]
pub struct Cli {
    /// City or place to render.
    #[arg(long)]
    pub city: String,

    #[arg(long, default_value = "")]
    pub country: String,

    #[arg(long, default_value = "default")]
    pub theme: String,

    /// Radius around the place, in metres.
    #[arg(long, default_value_t = 10_000)]
    pub distance: u32,

    /// Also email the finished poster here.
    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long = "format", default_value = "instagram")]
    pub output_format: String,

    /// Poster title; the city name when empty.
    #[arg(long = "title", default_value = "")]
    pub custom_title: String,

    /// Landmark pin as NAME@LAT,LON. Repeatable.
    #[arg(long = "landmark", value_parser = parse_landmark)]
    pub landmarks: Vec<Landmark>,

    #[arg(long, env = "POSTER_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Keep running after completion until the notification is dismissed.
    #[arg(long)]
    pub wait_notification: bool,
}

impl Cli {
    pub fn job_params(&self) -> JobParams {
        JobParams {
            place: self.city.clone(),
            country: self.country.clone(),
            theme: self.theme.clone(),
            distance: self.distance,
            email: self.email.clone(),
            output_format: self.output_format.clone(),
            custom_title: self.custom_title.clone(),
            landmarks: self.landmarks.clone(),
        }
    }

    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(log) = self.log {
            config.log = log;
        }
    }
}

fn parse_landmark(raw: &str) -> Result<Landmark, String> {
    let (name, coords) = raw
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@LAT,LON, got {raw:?}"))?;
    let (lat, lon) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON after '@', got {coords:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude {lon:?}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinates out of range: {lat},{lon}"));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err("landmark name is empty".to_string());
    }
    Ok(Landmark {
        name: name.to_string(),
        lat,
        lon,
    })
}
