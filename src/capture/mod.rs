//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing frames from a camera,
//! loading the empty-lot reference image, and managing capture
//! configuration. The camera is treated as a source of grayscale rasters;
//! everything downstream works on the `Frame` type alone.

mod camera;
mod config;
mod frame;
mod reference;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, DetectionConfig, FileConfig, OutputConfig};
pub use frame::Frame;
pub use reference::{load_reference, ReferenceError};
