//! Frame type representing a captured grayscale image with metadata.

use std::time::Instant;

/// A single captured frame from the camera.
///
/// Pixels are single-channel 8-bit intensity samples stored row-major.
/// Frames are transient: a new instance is produced for every detection
/// cycle and dropped once the cycle's mask has been computed.
#[derive(Clone)]
pub struct Frame {
    /// Raw grayscale pixel data, row-major.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp for staleness tracking.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Creates a frame filled with a single intensity value.
    pub fn flat(value: u8, width: u32, height: u32, sequence: u64) -> Self {
        let count = (width as usize) * (height as usize);
        Self::new(vec![value; count], width, height, sequence)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns true if this frame has the same dimensions as `other`.
    #[inline]
    pub fn same_dimensions(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 640 * 480];
        let frame = Frame::new(pixels, 640, 480, 1);

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = Frame::new(pixels, 640, 480, 1);

        assert!(!frame.is_valid());
    }

    #[test]
    fn test_flat_frame() {
        let frame = Frame::flat(128, 16, 8, 3);

        assert!(frame.is_valid());
        assert_eq!(frame.pixel_count(), 128);
        assert!(frame.pixels().iter().all(|&p| p == 128));
    }

    #[test]
    fn test_same_dimensions() {
        let a = Frame::flat(0, 32, 24, 1);
        let b = Frame::flat(255, 32, 24, 2);
        let c = Frame::flat(0, 24, 32, 3);

        assert!(a.same_dimensions(&b));
        assert!(!a.same_dimensions(&c));
    }
}
