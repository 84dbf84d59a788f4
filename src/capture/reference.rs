//! Reference image loading.
//!
//! The empty-lot reference is loaded once at startup, converted to 8-bit
//! grayscale, and checked against the configured capture resolution. A
//! mismatch here is a configuration error: the region table and the camera
//! framing are calibrated against this exact resolution.

use super::Frame;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the reference image.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to decode reference image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("reference image is {actual_w}x{actual_h}, capture is configured for {expected_w}x{expected_h}")]
    DimensionMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
}

/// Loads the empty-lot reference image as a grayscale frame.
///
/// Any format the `image` crate can decode is accepted; color inputs are
/// converted to luma. The returned frame carries sequence number 0 so it
/// never collides with captured frames.
pub fn load_reference(
    path: impl AsRef<Path>,
    expected_width: u32,
    expected_height: u32,
) -> Result<Frame, ReferenceError> {
    let luma = image::open(path.as_ref())?.to_luma8();
    let (actual_w, actual_h) = luma.dimensions();

    if actual_w != expected_width || actual_h != expected_height {
        return Err(ReferenceError::DimensionMismatch {
            expected_w: expected_width,
            expected_h: expected_height,
            actual_w,
            actual_h,
        });
    }

    tracing::info!(
        width = actual_w,
        height = actual_h,
        path = %path.as_ref().display(),
        "Loaded reference image"
    );

    Ok(Frame::new(luma.into_raw(), actual_w, actual_h, 0))
}
