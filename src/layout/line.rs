//! Divider lines, spot spans, and row groups.
//!
//! A parking spot is not described by its own box. The lot is annotated
//! with the painted divider lines between spots, and a spot's footprint is
//! the span from one divider line to the next. Rows of the lot are
//! separated by grass and driveway, so the line table is partitioned into
//! groups and only adjacent lines within a group pair up into spots.

use serde::{Deserialize, Serialize};

/// One painted divider line, given as its two endpoints in mask-pixel
/// space. Endpoints come from manual annotation and are not guaranteed to
/// be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerLine {
    /// First endpoint x.
    pub x1: u32,
    /// First endpoint y.
    pub y1: u32,
    /// Second endpoint x.
    pub x2: u32,
    /// Second endpoint y.
    pub y2: u32,
}

impl DividerLine {
    /// Creates a divider line from two endpoints.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Smaller of the two endpoint x values.
    #[inline]
    pub fn x_min(&self) -> u32 {
        self.x1.min(self.x2)
    }

    /// Larger of the two endpoint x values.
    #[inline]
    pub fn x_max(&self) -> u32 {
        self.x1.max(self.x2)
    }

    /// Smaller of the two endpoint y values.
    #[inline]
    pub fn y_min(&self) -> u32 {
        self.y1.min(self.y2)
    }

    /// Larger of the two endpoint y values.
    #[inline]
    pub fn y_max(&self) -> u32 {
        self.y1.max(self.y2)
    }
}

/// The pixel rectangle of one parking spot, spanning from a divider line
/// to the next line in the same group.
///
/// Bounds are half-open (`x0..x1`, `y0..y1`) so the covered area is exactly
/// `width * height`. The left line contributes the left x bound, the right
/// line the right x bound, and the y extent is the union of both lines'
/// y extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotSpan {
    /// Left bound, inclusive.
    pub x0: u32,
    /// Top bound, inclusive.
    pub y0: u32,
    /// Right bound, exclusive.
    pub x1: u32,
    /// Bottom bound, exclusive.
    pub y1: u32,
}

impl SpotSpan {
    /// Builds the span between two adjacent divider lines.
    pub fn between(left: &DividerLine, right: &DividerLine) -> Self {
        let xa = left.x_min();
        let xb = right.x_max();
        Self {
            x0: xa.min(xb),
            x1: xa.max(xb),
            y0: left.y_min().min(right.y_min()),
            y1: left.y_max().max(right.y_max()),
        }
    }

    /// Span width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    /// Span height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Raw pixel area of the span. Degenerate annotations yield zero.
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Returns true if the span lies fully within a `width` x `height` mask.
    #[inline]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 <= width && self.y1 <= height
    }
}

/// A half-open range `[start, end)` of divider-line indices forming one
/// row of the lot. A group of `n` lines yields `n - 1` spots; the gap to
/// the next group (grass, driveway) is never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotGroup {
    /// Index of the first line in the group, inclusive.
    pub start: usize,
    /// Index one past the last line in the group.
    pub end: usize,
}

impl SpotGroup {
    /// Creates a group over line indices `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of spots this group contributes. Malformed ranges
    /// (inverted or too small) contribute zero rather than underflowing.
    #[inline]
    pub fn spot_count(&self) -> usize {
        self.end.saturating_sub(self.start).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divider_line_bounds_ignore_order() {
        let line = DividerLine::new(198, 253, 191, 224);

        assert_eq!(line.x_min(), 191);
        assert_eq!(line.x_max(), 198);
        assert_eq!(line.y_min(), 224);
        assert_eq!(line.y_max(), 253);
    }

    #[test]
    fn test_span_between_lines() {
        let left = DividerLine::new(198, 224, 191, 253);
        let right = DividerLine::new(223, 225, 219, 253);
        let span = SpotSpan::between(&left, &right);

        assert_eq!(span.x0, 191);
        assert_eq!(span.x1, 223);
        assert_eq!(span.y0, 224);
        assert_eq!(span.y1, 253);
        assert_eq!(span.area(), 32 * 29);
    }

    #[test]
    fn test_degenerate_span_has_zero_area() {
        let line = DividerLine::new(10, 20, 10, 20);
        let span = SpotSpan::between(&line, &line);

        assert_eq!(span.area(), 0);
    }

    #[test]
    fn test_span_bounds_check() {
        let span = SpotSpan {
            x0: 0,
            y0: 0,
            x1: 10,
            y1: 10,
        };

        assert!(span.fits_within(10, 10));
        assert!(!span.fits_within(9, 10));
        assert!(!span.fits_within(10, 9));
    }

    #[test]
    fn test_group_spot_count() {
        assert_eq!(SpotGroup::new(0, 5).spot_count(), 4);
        assert_eq!(SpotGroup::new(5, 12).spot_count(), 6);
        assert_eq!(SpotGroup::new(3, 4).spot_count(), 0);
    }

    #[test]
    fn test_inverted_group_counts_zero_spots() {
        // A malformed range must count zero, not underflow.
        assert_eq!(SpotGroup::new(5, 3).spot_count(), 0);
        assert_eq!(SpotGroup::new(7, 7).spot_count(), 0);
    }
}
