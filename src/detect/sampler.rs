//! Stride-grid bright-pixel sampler.
//!
//! Visits every `SAMPLE_STEP`-th pixel in both axes, row-major, and yields the
//! ones whose mean RGB brightness strictly exceeds the scan mode's threshold.
//! Bright regions smaller than the stride can fall between grid points and be
//! missed entirely.

use anyhow::Result;

use crate::frame::{validate_rgba_len, BYTES_PER_PIXEL};
use crate::scan::ScanMode;

/// Grid stride in pixels, both axes.
pub const SAMPLE_STEP: u32 = 4;

/// One sampled point above threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub x: u32,
    pub y: u32,
    pub confidence: f32,
}

/// Mean of the red, green and blue channels.
pub fn brightness(rgb: &[u8]) -> f32 {
    (rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) as f32 / 3.0
}

/// Remap `value` above `threshold` onto `[0, 1]`, clamped.
pub fn confidence_above(value: f32, threshold: u8) -> f32 {
    let threshold = threshold as f32;
    ((value - threshold) / (255.0 - threshold)).clamp(0.0, 1.0)
}

/// Iterator over the candidates of one frame.
pub struct BrightSpots<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    threshold: u8,
    x: u32,
    y: u32,
}

impl<'a> BrightSpots<'a> {
    /// Fails when the buffer is not exactly `width * height` RGBA pixels.
    pub fn new(pixels: &'a [u8], width: u32, height: u32, mode: ScanMode) -> Result<Self> {
        validate_rgba_len(pixels.len(), width, height)?;
        Ok(Self {
            pixels,
            width,
            height,
            threshold: mode.threshold(),
            x: 0,
            y: 0,
        })
    }
}

impl Iterator for BrightSpots<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.width == 0 {
            return None;
        }
        while self.y < self.height {
            let (x, y) = (self.x, self.y);
            self.x += SAMPLE_STEP;
            if self.x >= self.width {
                self.x = 0;
                self.y += SAMPLE_STEP;
            }

            let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
            let value = brightness(&self.pixels[idx..idx + 3]);
            if value > self.threshold as f32 {
                return Some(Candidate {
                    x,
                    y,
                    confidence: confidence_above(value, self.threshold),
                });
            }
        }
        None
    }
}

/// Collect every candidate of a frame.
pub fn sample(pixels: &[u8], width: u32, height: u32, mode: ScanMode) -> Result<Vec<Candidate>> {
    Ok(BrightSpots::new(pixels, width, height, mode)?.collect())
}
