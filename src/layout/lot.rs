//! Lot layout: the divider-line table and its row grouping.
//!
//! The layout is data, not code. The builtin table carries the calibrated
//! coordinates for the production lot; other lots load their table from a
//! TOML file. Coordinates are never recomputed at runtime — recalibrating
//! the camera framing means shipping a new table.

use super::line::{DividerLine, SpotGroup, SpotSpan};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Calibrated divider lines for the production lot, as `(x1, y1, x2, y2)`.
const BUILTIN_LINES: [(u32, u32, u32, u32); 32] = [
    // Row 1
    (198, 224, 191, 253),
    (223, 225, 219, 253),
    (262, 228, 260, 258),
    (300, 231, 300, 261),
    (336, 231, 341, 261),
    // Row 2 (grass strip before it)
    (379, 234, 388, 265),
    (414, 234, 426, 266),
    (445, 240, 460, 268),
    (478, 242, 495, 270),
    (504, 242, 525, 271),
    (532, 245, 558, 273),
    (561, 245, 591, 272),
    // Row 3
    (200, 275, 189, 322),
    (240, 278, 233, 328),
    (280, 279, 280, 329),
    (319, 282, 327, 331),
    (364, 283, 374, 332),
    (402, 285, 418, 333),
    (440, 286, 459, 333),
    (474, 286, 500, 334),
    (509, 289, 536, 332),
    (543, 290, 557, 330),
    (571, 292, 600, 331),
    (606, 290, 632, 329),
    (632, 294, 662, 332),
    (657, 290, 685, 328),
    // Row 4
    (118, 405, 100, 475),
    (173, 408, 161, 480),
    (228, 412, 224, 479),
    (283, 414, 287, 480),
    (342, 413, 354, 481),
    (396, 413, 415, 480),
];

/// Row boundaries over `BUILTIN_LINES`, half-open. 5+7+14+6 lines yield
/// 4+6+13+5 = 28 spots.
const BUILTIN_GROUPS: [(usize, usize); 4] = [(0, 5), (5, 12), (12, 26), (26, 32)];

/// Errors raised while loading or validating a lot layout.
#[derive(Debug, Clone, Error)]
pub enum LayoutError {
    #[error("layout has no spot groups")]
    NoGroups,
    #[error("group {group} spans lines {start}..{end} but the table has {lines} lines")]
    GroupOutOfRange {
        group: usize,
        start: usize,
        end: usize,
        lines: usize,
    },
    #[error("group {group} has fewer than two lines, so it defines no spots")]
    GroupTooSmall { group: usize },
    #[error("group {group} overlaps or precedes the previous group")]
    GroupsOutOfOrder { group: usize },
    #[error("spot {spot} span ({x0},{y0})..({x1},{y1}) exceeds the {width}x{height} frame")]
    SpanOutOfBounds {
        spot: usize,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        width: u32,
        height: u32,
    },
    #[error("failed to read layout file: {0}")]
    FileReadError(String),
    #[error("failed to parse layout file: {0}")]
    ParseError(String),
}

/// The region table for one lot: divider lines plus their row grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotLayout {
    /// Divider lines, ordered left to right within each row.
    pub lines: Vec<DividerLine>,
    /// Half-open line-index ranges, one per lot row.
    pub groups: Vec<SpotGroup>,
}

impl LotLayout {
    /// Returns the calibrated layout for the production lot:
    /// 32 divider lines in 4 rows, 28 spots.
    pub fn builtin() -> Self {
        Self {
            lines: BUILTIN_LINES
                .iter()
                .map(|&(x1, y1, x2, y2)| DividerLine::new(x1, y1, x2, y2))
                .collect(),
            groups: BUILTIN_GROUPS
                .iter()
                .map(|&(start, end)| SpotGroup::new(start, end))
                .collect(),
        }
    }

    /// Loads a layout from a TOML file.
    ///
    /// The group structure is checked before the layout is returned, so a
    /// malformed file surfaces a `LayoutError` here rather than a panic at
    /// first use. Span bounds against the frame are still checked by
    /// `validate`, since the frame size is not known at load time.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LayoutError::FileReadError(e.to_string()))?;
        let layout: LotLayout =
            toml::from_str(&content).map_err(|e| LayoutError::ParseError(e.to_string()))?;
        layout.check_structure()?;
        Ok(layout)
    }

    /// Total number of scoreable spots across all groups.
    pub fn spot_count(&self) -> usize {
        self.groups.iter().map(|g| g.spot_count()).sum()
    }

    /// Derives the ordered spot spans: within each group, each line pairs
    /// with its successor. Group-boundary gaps produce no span.
    pub fn spans(&self) -> Vec<SpotSpan> {
        let mut spans = Vec::with_capacity(self.spot_count());
        for group in &self.groups {
            for i in group.start..group.end.saturating_sub(1) {
                spans.push(SpotSpan::between(&self.lines[i], &self.lines[i + 1]));
            }
        }
        spans
    }

    /// Checks that the groups are well-formed ranges over the line table:
    /// non-empty, in order, within bounds, and each defining at least one
    /// spot. This is the precondition for `spans()` and `spot_count()`.
    fn check_structure(&self) -> Result<(), LayoutError> {
        if self.groups.is_empty() {
            return Err(LayoutError::NoGroups);
        }

        let mut previous_end = 0usize;
        for (idx, group) in self.groups.iter().enumerate() {
            if group.end > self.lines.len() || group.start >= group.end {
                return Err(LayoutError::GroupOutOfRange {
                    group: idx,
                    start: group.start,
                    end: group.end,
                    lines: self.lines.len(),
                });
            }
            if group.spot_count() == 0 {
                return Err(LayoutError::GroupTooSmall { group: idx });
            }
            if group.start < previous_end {
                return Err(LayoutError::GroupsOutOfOrder { group: idx });
            }
            previous_end = group.end;
        }

        Ok(())
    }

    /// Checks structural consistency and that every span fits within a
    /// `width` x `height` frame. Called once at startup; the detection
    /// loop must not start if this fails.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), LayoutError> {
        self.check_structure()?;

        for (spot, span) in self.spans().iter().enumerate() {
            if !span.fits_within(width, height) {
                return Err(LayoutError::SpanOutOfBounds {
                    spot,
                    x0: span.x0,
                    y0: span.y0,
                    x1: span.x1,
                    y1: span.y1,
                    width,
                    height,
                });
            }
        }

        Ok(())
    }
}
