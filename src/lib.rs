//! Parking Lot Occupancy Detection Library
//!
//! Detects which parking spots are occupied by differencing live camera
//! frames against a static empty-lot reference image.
//!
//! # Architecture
//!
//! The system follows an explicit data flow, one detection cycle at a time:
//!
//! ```text
//! capture → differencer → binary mask → evaluator → occupancy vector
//!                              ↑
//!                   layout (static region table)
//! ```
//!
//! # Design Principles
//!
//! - **Immutable reference**: the empty-lot image is smoothed once at load
//!   and never mutated afterward
//! - **Geometry is configuration**: spot boundaries are calibrated data,
//!   never computed from pixels
//! - **Fail-fast on contract breaks**: resolution mismatches between
//!   camera, reference, and region table stop the loop instead of
//!   publishing garbage
//! - **Injected collaborators**: camera and display are traits, so the
//!   core runs against mocks with no hardware attached
//!
//! # Example
//!
//! ```no_run
//! use lotwatch::{
//!     capture::{Camera, CaptureConfig, DetectionConfig, Frame, MockCamera},
//!     detection::{FrameDifferencer, SpotEvaluator},
//!     layout::LotLayout,
//!     pipeline::{DetectionPipeline, MemorySink},
//! };
//!
//! let capture = CaptureConfig::with_dimensions(720, 540);
//! let detection = DetectionConfig::default();
//!
//! let layout = LotLayout::builtin();
//! layout.validate(capture.width, capture.height).unwrap();
//!
//! let mut camera = MockCamera::new();
//! camera.open(&capture).unwrap();
//!
//! let reference = Frame::flat(128, capture.width, capture.height, 0);
//! let mut pipeline = DetectionPipeline::new(
//!     camera,
//!     FrameDifferencer::new(reference, &detection),
//!     SpotEvaluator::new(&layout, &detection),
//!     MemorySink::new(),
//! );
//!
//! let state = pipeline.run_cycle().unwrap();
//! println!("{} of {} spots empty", state.empty_count(), state.states().len());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod detection;
pub mod layout;
pub mod pipeline;

// Re-export commonly used types at crate root
pub use capture::{Camera, CaptureConfig, DetectionConfig, FileConfig, Frame, MockCamera};
pub use detection::{BinaryMask, FrameDifferencer, LotState, SpotEvaluator, SpotState};
pub use layout::{DividerLine, LotLayout, SpotGroup, SpotSpan};
pub use pipeline::{DetectionPipeline, OccupancySink};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
