//! Frame differencing against the empty-lot reference.
//!
//! Produces the binary mask the evaluator scores: smooth both frames,
//! take the absolute per-pixel difference, and binarize against a fixed
//! one-sided threshold.

use super::mask::BinaryMask;
use super::smoothing::GaussianSmoother;
use super::DetectionError;
use crate::capture::{DetectionConfig, Frame};

/// Differences live frames against a held reference.
///
/// The reference is smoothed exactly once, at construction, and is
/// immutable afterward. Smoothing it again on every cycle would compound
/// the blur and progressively erode the reference, drifting the
/// classification over long runs.
pub struct FrameDifferencer {
    /// Smoothed empty-lot reference.
    reference: Frame,
    /// Shared smoother, applied to a copy of each live frame.
    smoother: GaussianSmoother,
    /// Differences strictly below this are treated as sensor noise.
    threshold: u8,
    /// Value written for cells at or above the threshold.
    saturation: u8,
}

impl FrameDifferencer {
    /// Creates a differencer, smoothing the reference once up front.
    pub fn new(reference: Frame, config: &DetectionConfig) -> Self {
        let smoother = GaussianSmoother::new(config);
        let reference = smoother.smooth(&reference);
        Self {
            reference,
            smoother,
            threshold: config.diff_threshold,
            saturation: config.saturation,
        }
    }

    /// Returns the held (already smoothed) reference.
    pub fn reference(&self) -> &Frame {
        &self.reference
    }

    /// Computes the binary difference mask for a live frame.
    ///
    /// Fails with `DimensionMismatch` if the frame does not match the
    /// reference resolution; that is a configuration error, not something
    /// to negotiate at runtime. Takes `&self`: repeated calls with the
    /// same frame produce identical masks.
    pub fn diff(&self, current: &Frame) -> Result<BinaryMask, DetectionError> {
        if !current.same_dimensions(&self.reference) {
            return Err(DetectionError::DimensionMismatch {
                expected_w: self.reference.width(),
                expected_h: self.reference.height(),
                actual_w: current.width(),
                actual_h: current.height(),
            });
        }

        let smoothed = self.smoother.smooth(current);

        let cells: Vec<u8> = smoothed
            .pixels()
            .iter()
            .zip(self.reference.pixels().iter())
            .map(|(&c, &r)| {
                if c.abs_diff(r) >= self.threshold {
                    self.saturation
                } else {
                    0
                }
            })
            .collect();

        tracing::trace!(
            sequence = current.sequence(),
            set_cells = cells.iter().filter(|&&v| v != 0).count(),
            "Computed difference mask"
        );

        Ok(BinaryMask::from_cells(
            cells,
            current.width(),
            current.height(),
            current.sequence(),
        ))
    }
}
