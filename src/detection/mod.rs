//! The detection core.
//!
//! Two stages, evaluated leaf-first: the frame differencer turns a live
//! frame plus the held reference into a binary mask, and the spot
//! evaluator turns that mask plus the lot layout into an occupancy
//! vector. Both stages are pure with respect to their held state, so a
//! cycle can be replayed for debugging.

mod differencer;
mod evaluator;
mod mask;
mod smoothing;

pub use differencer::FrameDifferencer;
pub use evaluator::{LotState, SpotEvaluator, SpotState};
pub use mask::BinaryMask;
pub use smoothing::GaussianSmoother;

use thiserror::Error;

/// Errors raised by the detection core.
///
/// All of these are configuration faults: the resolution contract between
/// camera, reference, and region table has been broken. They are fatal to
/// the detection loop, not retried.
#[derive(Debug, Clone, Error)]
pub enum DetectionError {
    #[error("frame is {actual_w}x{actual_h}, reference is {expected_w}x{expected_h}")]
    DimensionMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
    #[error("spot {spot} span extends to ({x1},{y1}), outside the {width}x{height} mask")]
    SpanOutOfBounds {
        spot: usize,
        x1: u32,
        y1: u32,
        width: u32,
        height: u32,
    },
}
