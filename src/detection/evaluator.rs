//! Per-spot occupancy scoring.
//!
//! Walks the precomputed spot spans over a binary mask and classifies
//! each spot by how much of its span is covered by difference pixels.

use super::mask::BinaryMask;
use super::DetectionError;
use crate::capture::DetectionConfig;
use crate::layout::{LotLayout, SpotSpan};

/// Classification of a single parking spot.
///
/// Wire codes match the historical vector format: 0 = full, 1 = empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotState {
    /// Enough of the span differs from the empty-lot reference.
    Full,
    /// The span matches the reference.
    Empty,
}

impl SpotState {
    /// Integer code as published to display consumers.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            SpotState::Full => 0,
            SpotState::Empty => 1,
        }
    }

    /// Returns true if the spot is classified empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, SpotState::Empty)
    }
}

/// One cycle's occupancy snapshot: an ordered state per real spot.
///
/// Produced atomically per detection cycle and never mutated afterward;
/// consumers always see a complete vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotState {
    states: Vec<SpotState>,
    /// Sequence number of the frame this snapshot was derived from.
    sequence: u64,
}

impl LotState {
    pub(crate) fn new(states: Vec<SpotState>, sequence: u64) -> Self {
        Self { states, sequence }
    }

    /// Per-spot states, indexed to match real-world spot numbering.
    #[inline]
    pub fn states(&self) -> &[SpotState] {
        &self.states
    }

    /// Per-spot integer codes (0 = full, 1 = empty).
    pub fn codes(&self) -> Vec<u8> {
        self.states.iter().map(|s| s.code()).collect()
    }

    /// Compact code string, e.g. `1110010...`, one digit per spot.
    pub fn code_string(&self) -> String {
        self.states
            .iter()
            .map(|s| char::from(b'0' + s.code()))
            .collect()
    }

    /// Number of empty spots in this snapshot.
    pub fn empty_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_empty()).count()
    }

    /// Sequence number of the frame this snapshot was derived from.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Scores spot spans against binary masks.
///
/// The span table is derived from the layout once, at construction, and
/// reused every cycle. `evaluate` is a pure function of the mask.
pub struct SpotEvaluator {
    /// Precomputed spans, one per real spot.
    spans: Vec<SpotSpan>,
    /// Coverage fraction at which a spot stops being empty.
    coverage_ratio: f64,
}

impl SpotEvaluator {
    /// Builds an evaluator from a layout and the detection config.
    pub fn new(layout: &LotLayout, config: &DetectionConfig) -> Self {
        Self {
            spans: layout.spans(),
            coverage_ratio: config.coverage_ratio,
        }
    }

    /// Number of spots this evaluator scores.
    pub fn spot_count(&self) -> usize {
        self.spans.len()
    }

    /// Classifies every spot against the mask.
    ///
    /// A spot is empty iff its covered-cell count is strictly below
    /// `coverage_ratio` of its span area; coverage exactly at the ratio
    /// counts as full. A zero-area span is conservatively classified full
    /// and logged, never silently divided against.
    pub fn evaluate(&self, mask: &BinaryMask) -> Result<LotState, DetectionError> {
        let mut states = Vec::with_capacity(self.spans.len());

        for (spot, span) in self.spans.iter().enumerate() {
            if !span.fits_within(mask.width(), mask.height()) {
                return Err(DetectionError::SpanOutOfBounds {
                    spot,
                    x1: span.x1,
                    y1: span.y1,
                    width: mask.width(),
                    height: mask.height(),
                });
            }

            let area = span.area();
            if area == 0 {
                tracing::warn!(spot, "Degenerate zero-area span, classifying as full");
                states.push(SpotState::Full);
                continue;
            }

            let covered = mask.covered_in(span);
            let state = if (covered as f64) < self.coverage_ratio * (area as f64) {
                SpotState::Empty
            } else {
                SpotState::Full
            };
            states.push(state);
        }

        Ok(LotState::new(states, mask.sequence()))
    }
}
