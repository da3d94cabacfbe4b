//! Frame container.
//!
//! - `RgbaFrame`: one captured video frame, RGBA, 8 bits per channel, row-major.
//!
//! Construction never validates the buffer. Sources may hand over whatever the
//! device produced; the analyzer boundary checks the layout and degrades a
//! malformed frame to a clear result instead of failing the capture loop.

use anyhow::{anyhow, Result};
use image::RgbaImage;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

// ----------------------------------------------------------------------------
// RgbaFrame
// ----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Position of this frame in its source's stream, starting at 1.
    pub sequence: u64,
}

impl RgbaFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            sequence: 0,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Solid frame where every pixel has the given RGB value and full alpha.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self::new(data, width, height)
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// RGBA value at `(x, y)`, or `None` outside the frame or past the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.data.get(idx..idx + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        if let Some(px) = self.data.get_mut(idx..idx + BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_rgba_len(self.data.len(), self.width, self.height)
    }
}

/// Expected byte length of an RGBA buffer of the given dimensions.
pub fn rgba_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| anyhow!("frame dimensions {}x{} overflow", width, height))
}

pub fn validate_rgba_len(len: usize, width: u32, height: u32) -> Result<()> {
    let expected = rgba_len(width, height)?;
    if len != expected {
        return Err(anyhow!(
            "expected {} RGBA bytes for {}x{}, received {}",
            expected,
            width,
            height,
            len
        ));
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_frame_has_rgba_layout() -> Result<()> {
        let frame = RgbaFrame::filled(3, 2, [10, 20, 30]);
        frame.validate()?;
        assert_eq!(frame.byte_len(), 3 * 2 * 4);
        assert_eq!(frame.pixel(2, 1), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(3, 0), None);
        Ok(())
    }

    #[test]
    fn set_pixel_ignores_out_of_range() {
        let mut frame = RgbaFrame::filled(2, 2, [0, 0, 0]);
        frame.set_pixel(1, 1, [255, 255, 255, 255]);
        frame.set_pixel(5, 5, [1, 1, 1, 1]);
        assert_eq!(frame.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn validate_rejects_short_buffer() {
        let frame = RgbaFrame::new(vec![0u8; 15], 2, 2);
        assert!(frame.validate().is_err());
        assert_eq!(frame.pixel(1, 1), None);
    }

    #[test]
    fn zero_sized_frame_is_valid() -> Result<()> {
        RgbaFrame::new(Vec::new(), 0, 0).validate()
    }
}
