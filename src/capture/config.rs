//! Capture and detection configuration.
//!
//! The reference image resolution and the camera resolution are coupled by
//! contract, not negotiated at runtime, so dimension settings live here and
//! are validated before the detection loop is allowed to start.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for camera capture.
///
/// Frames are captured as single-channel grayscale at a fixed resolution.
/// Changing the resolution requires a matching reference image and region
/// table, so these values are startup-time constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second of the source.
    pub fps: u32,
    /// Capture in grayscale mode (the detection core requires it).
    pub grayscale: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 720,
            height: 540,
            fps: 30,
            grayscale: true,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Tunables for the detection core.
///
/// Defaults reproduce the production lot setup: a 9x9 Gaussian blur with
/// sigma 2 to suppress sensor jitter, a one-sided difference threshold of
/// 25, and a 60% coverage cutoff for calling a spot full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Gaussian kernel size (must be odd).
    pub blur_kernel: u32,
    /// Gaussian sigma, applied in both axes.
    pub blur_sigma: f64,
    /// Absolute-difference threshold; differences below this are noise.
    pub diff_threshold: u8,
    /// Value written for mask cells at or above the threshold.
    pub saturation: u8,
    /// Fraction of a spot span that must be covered to call it full.
    pub coverage_ratio: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 9,
            blur_sigma: 2.0,
            diff_threshold: 25,
            saturation: 250,
            coverage_ratio: 0.6,
        }
    }
}

impl DetectionConfig {
    /// Validates the detection parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(ConfigError::InvalidKernel(self.blur_kernel));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(ConfigError::InvalidSigma(self.blur_sigma));
        }
        if self.saturation == 0 {
            return Err(ConfigError::InvalidSaturation);
        }
        if !(self.coverage_ratio > 0.0 && self.coverage_ratio <= 1.0) {
            return Err(ConfigError::InvalidCoverageRatio(self.coverage_ratio));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("blur kernel size {0} must be odd and non-zero")]
    InvalidKernel(u32),
    #[error("blur sigma {0} must be positive and finite")]
    InvalidSigma(f64),
    #[error("mask saturation value must be non-zero")]
    InvalidSaturation,
    #[error("coverage ratio {0} must be in (0, 1]")]
    InvalidCoverageRatio(f64),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Detection loop cadence and duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Run continuously (true) or process a fixed number of cycles (false).
    pub continuous: bool,
    /// Number of detection cycles if not continuous.
    pub cycle_count: u32,
    /// Delay between detection cycles in milliseconds.
    pub interval_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            cycle_count: 40,
            interval_ms: 250,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.capture.validate()?;
        config.detection.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_even_kernel_invalid() {
        let mut config = DetectionConfig::default();
        config.blur_kernel = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKernel(8))
        ));
    }

    #[test]
    fn test_coverage_ratio_bounds() {
        let mut config = DetectionConfig::default();
        config.coverage_ratio = 0.0;
        assert!(config.validate().is_err());

        config.coverage_ratio = 1.0;
        assert!(config.validate().is_ok());

        config.coverage_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_config_round_trip() {
        let config = FileConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: FileConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed.capture.width, config.capture.width);
        assert_eq!(parsed.detection.diff_threshold, config.detection.diff_threshold);
        assert_eq!(parsed.output.cycle_count, config.output.cycle_count);
    }
}
