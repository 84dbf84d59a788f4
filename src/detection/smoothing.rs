//! Gaussian smoothing.
//!
//! Both the live frame and the reference are blurred before differencing
//! so that sensor jitter on static background does not register as a
//! false difference. The kernel is separable, so the 2D blur runs as a
//! horizontal pass followed by a vertical pass with replicated borders.

use crate::capture::{DetectionConfig, Frame};

/// Separable Gaussian smoother with a fixed kernel.
///
/// Built once from the detection config (9x9, sigma 2 in production) and
/// reused for every frame.
#[derive(Debug, Clone)]
pub struct GaussianSmoother {
    /// Normalized 1D kernel taps.
    taps: Vec<f32>,
    /// Half kernel width.
    radius: usize,
}

impl GaussianSmoother {
    /// Builds a smoother from the configured kernel size and sigma.
    ///
    /// The kernel size must be odd; `DetectionConfig::validate` enforces
    /// this before a smoother is ever constructed.
    pub fn new(config: &DetectionConfig) -> Self {
        let size = config.blur_kernel.max(1) as usize;
        let radius = size / 2;
        let sigma = config.blur_sigma;

        let mut taps: Vec<f32> = (0..size)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-(x * x) / (2.0 * sigma * sigma)).exp() as f32
            })
            .collect();

        let sum: f32 = taps.iter().sum();
        for tap in &mut taps {
            *tap /= sum;
        }

        Self { taps, radius }
    }

    /// Smooths a frame, returning a new frame with the same dimensions
    /// and sequence number. The input is never modified.
    pub fn smooth(&self, frame: &Frame) -> Frame {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let src = frame.pixels();

        // Horizontal pass into an intermediate float plane.
        let mut horizontal = vec![0.0f32; width * height];
        for y in 0..height {
            let row = &src[y * width..(y + 1) * width];
            for x in 0..width {
                let mut acc = 0.0f32;
                for (k, &tap) in self.taps.iter().enumerate() {
                    let sx = clamp_index(x as isize + k as isize - self.radius as isize, width);
                    acc += tap * f32::from(row[sx]);
                }
                horizontal[y * width + x] = acc;
            }
        }

        // Vertical pass back to 8-bit.
        let mut out = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                let mut acc = 0.0f32;
                for (k, &tap) in self.taps.iter().enumerate() {
                    let sy = clamp_index(y as isize + k as isize - self.radius as isize, height);
                    acc += tap * horizontal[sy * width + x];
                }
                out[y * width + x] = acc.round().clamp(0.0, 255.0) as u8;
            }
        }

        Frame::new(out, frame.width(), frame.height(), frame.sequence())
    }
}

/// Replicate-border index clamp.
#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> GaussianSmoother {
        GaussianSmoother::new(&DetectionConfig::default())
    }

    #[test]
    fn test_taps_normalized() {
        let s = smoother();
        let sum: f32 = s.taps.iter().sum();

        assert_eq!(s.taps.len(), 9);
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_frame_unchanged() {
        let frame = Frame::flat(97, 32, 24, 1);
        let smoothed = smoother().smooth(&frame);

        assert!(smoothed.pixels().iter().all(|&p| p == 97));
        assert_eq!(smoothed.sequence(), 1);
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let width = 21u32;
        let height = 21u32;
        let mut pixels = vec![0u8; (width * height) as usize];
        pixels[(10 * width + 10) as usize] = 255;

        let smoothed = smoother().smooth(&Frame::new(pixels, width, height, 1));
        let get = |x: u32, y: u32| smoothed.pixels()[(y * width + x) as usize];

        // Peak stays at the center and neighbors match by symmetry
        assert!(get(10, 10) >= get(9, 10));
        assert_eq!(get(9, 10), get(11, 10));
        assert_eq!(get(10, 9), get(10, 11));
        assert_eq!(get(7, 10), get(13, 10));

        // Mass well outside the kernel support is untouched
        assert_eq!(get(0, 0), 0);
    }

    #[test]
    fn test_smoothing_reduces_jitter() {
        let width = 16u32;
        let height = 16u32;
        // Checkerboard jitter around a mid level
        let pixels: Vec<u8> = (0..width * height)
            .map(|i| if (i / width + i % width) % 2 == 0 { 118 } else { 138 })
            .collect();

        let smoothed = smoother().smooth(&Frame::new(pixels, width, height, 1));

        // After the blur every pixel sits near the 128 mean
        assert!(smoothed.pixels().iter().all(|&p| (125..=131).contains(&p)));
    }
}
