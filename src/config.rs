use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Adaptive filter parameters, shared by every channel of a run
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Assumed video frame rate (Hz). Timestamp = frame index / frame_rate
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Cutoff at rest (Hz)
    #[serde(default = "default_min_cutoff")]
    pub min_cutoff: f64,
    /// Speed → cutoff coupling
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Cutoff applied to the velocity estimate (Hz)
    #[serde(default = "default_derivative_cutoff")]
    pub derivative_cutoff: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RotationConfig {
    /// Pose frames with any other landmark count are skipped
    #[serde(default = "default_expected_pose_landmarks")]
    pub expected_pose_landmarks: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Process tracks on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_frame_rate() -> f64 { 30.0 }
fn default_min_cutoff() -> f64 { 1.0 }
fn default_beta() -> f64 { 0.0 }
fn default_derivative_cutoff() -> f64 { 1.0 }
fn default_expected_pose_landmarks() -> usize { crate::pose::PoseLandmark::COUNT }
fn default_parallel() -> bool { true }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            min_cutoff: default_min_cutoff(),
            beta: default_beta(),
            derivative_cutoff: default_derivative_cutoff(),
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            expected_pose_landmarks: default_expected_pose_landmarks(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::invalid("filter.frame_rate", format!("must be > 0, got {}", self.frame_rate)));
        }
        if !(self.min_cutoff.is_finite() && self.min_cutoff > 0.0) {
            return Err(ConfigError::invalid("filter.min_cutoff", format!("must be > 0, got {}", self.min_cutoff)));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(ConfigError::invalid("filter.beta", format!("must be >= 0, got {}", self.beta)));
        }
        if !(self.derivative_cutoff.is_finite() && self.derivative_cutoff > 0.0) {
            return Err(ConfigError::invalid(
                "filter.derivative_cutoff",
                format!("must be > 0, got {}", self.derivative_cutoff),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Defaults when the file does not exist. A file that exists but does not
    /// parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.validate()?;
        if self.rotation.expected_pose_landmarks == 0 {
            return Err(ConfigError::invalid("rotation.expected_pose_landmarks", "must be > 0"));
        }
        Ok(())
    }
}
