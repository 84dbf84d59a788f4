//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.
//! The detection core never talks to a device directly; it only sees the
//! `Camera` trait, so it can be exercised without any hardware attached.

use super::{CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing. Frames must be grayscale
/// rasters of the configured dimensions.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Mock camera that replays queued frames, or synthesizes flat
/// mid-gray frames once the queue is exhausted.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    queued: Vec<Vec<u8>>,
    sequence: u64,
}

impl MockCamera {
    /// Creates a mock camera with no queued frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock camera that replays the given pixel buffers in order.
    ///
    /// Each buffer must match the dimensions the camera is opened with.
    pub fn with_frames(frames: Vec<Vec<u8>>) -> Self {
        // Queue is popped from the back; store reversed so replay is in order.
        let mut queued = frames;
        queued.reverse();
        Self {
            config: None,
            queued,
            sequence: 0,
        }
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let pixel_count = (config.width * config.height) as usize;
        let pixels = match self.queued.pop() {
            Some(buf) => {
                if buf.len() != pixel_count {
                    return Err(CameraError::CaptureFailed(format!(
                        "queued frame has {} pixels, expected {}",
                        buf.len(),
                        pixel_count
                    )));
                }
                buf
            }
            None => vec![128u8; pixel_count],
        };

        self.sequence += 1;
        Ok(Frame::new(pixels, config.width, config.height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(
            camera.capture(),
            Err(CameraError::NotInitialized)
        ));
    }

    #[test]
    fn test_queued_frames_replay_in_order() {
        let config = CaptureConfig::with_dimensions(4, 2);
        let first = vec![10u8; 8];
        let second = vec![20u8; 8];

        let mut camera = MockCamera::with_frames(vec![first.clone(), second.clone()]);
        camera.open(&config).unwrap();

        assert_eq!(camera.capture().unwrap().pixels(), first.as_slice());
        assert_eq!(camera.capture().unwrap().pixels(), second.as_slice());

        // Queue exhausted: falls back to flat frames
        assert!(camera.capture().unwrap().pixels().iter().all(|&p| p == 128));
    }

    #[test]
    fn test_queued_frame_wrong_size_fails() {
        let config = CaptureConfig::with_dimensions(4, 2);
        let mut camera = MockCamera::with_frames(vec![vec![0u8; 3]]);
        camera.open(&config).unwrap();

        assert!(matches!(
            camera.capture(),
            Err(CameraError::CaptureFailed(_))
        ));
    }
}
