//! Simulation settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Bounds, SteeringParams};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of fish spawned at startup
    pub population: usize,
    /// Run seed; a random one is drawn when absent
    pub seed: Option<u64>,
    /// World width in world units
    pub width: f32,
    /// World height in world units
    pub height: f32,
    /// Fixed frame interval for headless runs (ms)
    pub frame_ms: f32,
    /// Flocking and flee tunables
    pub steering: SteeringParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            population: 100,
            seed: None,
            width: 100.0,
            height: 100.0,
            frame_ms: 1000.0 / 60.0,
            steering: SteeringParams::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON, then validate and sanitize them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject unusable values; clamp the steering tunables
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        self.bounds()?;
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(SettingsError::Invalid("frame_ms must be positive"));
        }
        self.steering.sanitize();
        Ok(())
    }

    /// The world rectangle described by `width` and `height`
    pub fn bounds(&self) -> Result<Bounds, SettingsError> {
        Bounds::new(self.width, self.height)
            .map_err(|_| SettingsError::Invalid("width and height must be in (0, 100000]"))
    }
}
