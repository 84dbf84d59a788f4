//! Binary difference mask.
//!
//! The mask is the differencer's output: a raster the size of the current
//! frame where each cell is either 0 (matches the reference) or the
//! saturation value (differs beyond threshold). Scoring only asks how many
//! cells are set, so the exact saturation value never leaks into the
//! occupancy math.

use crate::layout::SpotSpan;

/// A binarized difference raster.
///
/// Sized to the actual frame it was derived from, never to a fixed
/// worst-case buffer. Carries the source frame's sequence number so the
/// published occupancy vector can be traced back to its capture.
#[derive(Debug, Clone)]
pub struct BinaryMask {
    /// Cell values, row-major; 0 or the configured saturation value.
    cells: Vec<u8>,
    /// Mask width in pixels.
    width: u32,
    /// Mask height in pixels.
    height: u32,
    /// Sequence number of the frame this mask was derived from.
    sequence: u64,
}

impl BinaryMask {
    /// Wraps an existing cell buffer.
    pub fn from_cells(cells: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        debug_assert_eq!(cells.len(), (width as usize) * (height as usize));
        Self {
            cells,
            width,
            height,
            sequence,
        }
    }

    /// Creates a mask with every cell set to `value`.
    pub fn filled(value: u8, width: u32, height: u32, sequence: u64) -> Self {
        let count = (width as usize) * (height as usize);
        Self::from_cells(vec![value; count], width, height, sequence)
    }

    /// Mask width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sequence number of the frame this mask was derived from.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the raw cell buffer.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Sets every cell in the half-open rectangle to `value`.
    ///
    /// Out-of-range portions are clipped. Intended for synthetic masks in
    /// tests and calibration tooling.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                self.cells[row + x as usize] = value;
            }
        }
    }

    /// Counts set (non-zero) cells within a spot span.
    ///
    /// The caller is responsible for bounds-checking the span against the
    /// mask; the evaluator does so before ever calling this.
    pub fn covered_in(&self, span: &SpotSpan) -> u64 {
        debug_assert!(span.fits_within(self.width, self.height));

        let mut covered = 0u64;
        for y in span.y0..span.y1 {
            let row = (y * self.width) as usize;
            for x in span.x0..span.x1 {
                if self.cells[row + x as usize] != 0 {
                    covered += 1;
                }
            }
        }
        covered
    }
}
