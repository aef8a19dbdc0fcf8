//! Configuration management for the technique analysis pipeline

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_LIVE_DURATION_SECS, DEFAULT_LIVE_INTERVAL_MS, DEFAULT_SEEK_TIMEOUT_MS,
    DEFAULT_TARGET_FRAMES,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub model: ModelConfig,

    /// Camera capture configuration
    pub camera: CameraConfig,

    /// Frame sampling configuration
    pub sampling: SamplingConfig,
}

/// Model file path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the MoveNet Thunder ONNX model
    pub path: PathBuf,
}

/// Camera capture parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Capture device index
    pub device_id: i32,

    /// Requested capture width in pixels
    pub width: u32,

    /// Requested capture height in pixels
    pub height: u32,

    /// Requested capture framerate
    pub fps: u32,
}

/// Frame sampling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Number of frames to sample from an uploaded video
    pub target_frames: usize,

    /// Milliseconds between live camera samples
    pub live_interval_ms: u64,

    /// Length of a live analysis session in seconds
    pub live_duration_secs: u64,

    /// Per-frame seek/decode timeout in milliseconds
    pub seek_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            camera: CameraConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/movenet_thunder.onnx"),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 1280,
            height: 720,
            fps: 30,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            target_frames: DEFAULT_TARGET_FRAMES,
            live_interval_ms: DEFAULT_LIVE_INTERVAL_MS,
            live_duration_secs: DEFAULT_LIVE_DURATION_SECS,
            seek_timeout_ms: DEFAULT_SEEK_TIMEOUT_MS,
        }
    }
}

impl SamplingConfig {
    /// Interval between live camera samples
    #[must_use]
    pub fn live_interval(&self) -> Duration {
        Duration::from_millis(self.live_interval_ms)
    }

    /// Per-frame seek/decode timeout
    #[must_use]
    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sampling.target_frames == 0 {
            return Err(Error::ConfigError(
                "Target frame count must be greater than 0".to_string(),
            ));
        }
        if self.sampling.live_interval_ms == 0 {
            return Err(Error::ConfigError(
                "Live sample interval must be greater than 0".to_string(),
            ));
        }
        if self.sampling.live_duration_secs == 0 {
            return Err(Error::ConfigError(
                "Live session duration must be greater than 0".to_string(),
            ));
        }
        if self.sampling.seek_timeout_ms == 0 {
            return Err(Error::ConfigError(
                "Seek timeout must be greater than 0".to_string(),
            ));
        }

        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(Error::ConfigError(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if !self.model.path.exists() {
            return Err(Error::ConfigError(format!(
                "Pose model not found: {}",
                self.model.path.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Volleyball Technique Analysis Configuration

# Model path
model:
  path: "assets/movenet_thunder.onnx"

# Camera capture
camera:
  device_id: 0
  width: 1280
  height: 720
  fps: 30

# Frame sampling
sampling:
  target_frames: 10
  live_interval_ms: 1000
  live_duration_secs: 10
  seek_timeout_ms: 2000
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sampling.target_frames, 10);
        assert_eq!(config.sampling.live_interval_ms, 1000);
        assert_eq!(config.camera.device_id, 0);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.camera.height, 720);
    }

    #[test]
    fn test_example_config() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(
            parsed.sampling.target_frames,
            Config::default().sampling.target_frames
        );
        assert_eq!(parsed.model.path, Config::default().model.path);
    }

    #[test]
    fn test_partial_config() {
        let yaml = "camera:\n  device_id: 2\n  width: 640\n  height: 480\n  fps: 15\n";
        let parsed: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.camera.device_id, 2);
        assert_eq!(parsed.sampling.target_frames, 10);
    }

    #[test]
    fn test_zero_target_frames() {
        let mut config = Config::default();
        config.sampling.target_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_model_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.model.path = dir.path().join("absent.onnx");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_with_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.onnx");
        std::fs::write(&model, b"stub").unwrap();
        let mut config = Config::default();
        config.model.path = model;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut config = Config::default();
        config.camera.device_id = 3;
        config.sampling.target_frames = 25;
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.camera.device_id, 3);
        assert_eq!(loaded.sampling.target_frames, 25);
    }
}
