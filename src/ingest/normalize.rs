use anyhow::{anyhow, Result};

use crate::frame::{rgba_len, BYTES_PER_PIXEL};

/// Device pixel layouts converted to RGBA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PixelFormat {
    Rgb24,
    Yuyv,
    Nv12,
}

pub(crate) fn normalize_to_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<Vec<u8>> {
    match format {
        PixelFormat::Rgb24 => rgb_to_rgba(pixels, width, height),
        PixelFormat::Yuyv => yuyv_to_rgba(pixels, width, height),
        PixelFormat::Nv12 => nv12_to_rgba(pixels, width, height),
    }
}

fn rgb_to_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| anyhow!("RGB frame dimensions overflow"))? as usize;
    if pixels.len() != expected {
        return Err(anyhow!(
            "RGB frame length mismatch: expected {}, got {}",
            expected,
            pixels.len()
        ));
    }
    let mut rgba = Vec::with_capacity(rgba_len(width, height)?);
    for px in pixels.chunks_exact(3) {
        rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    Ok(rgba)
}

fn yuyv_to_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    if width % 2 != 0 {
        return Err(anyhow!("YUYV frame width must be even, got {}", width));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(2))
        .ok_or_else(|| anyhow!("YUYV frame dimensions overflow"))? as usize;
    if pixels.len() != expected {
        return Err(anyhow!(
            "YUYV frame length mismatch: expected {}, got {}",
            expected,
            pixels.len()
        ));
    }

    let mut rgba = Vec::with_capacity(rgba_len(width, height)?);
    for quad in pixels.chunks_exact(4) {
        let u = quad[1] as f32 - 128.0;
        let v = quad[3] as f32 - 128.0;
        for y in [quad[0], quad[2]] {
            let [r, g, b] = yuv_to_rgb(y as f32, u, v);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    Ok(rgba)
}

fn nv12_to_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let w = width as usize;
    let h = height as usize;
    let y_plane = w
        .checked_mul(h)
        .ok_or_else(|| anyhow!("NV12 frame dimensions overflow"))?;
    let expected = y_plane
        .checked_add(y_plane / 2)
        .ok_or_else(|| anyhow!("NV12 frame dimensions overflow"))?;
    if pixels.len() != expected {
        return Err(anyhow!(
            "NV12 frame length mismatch: expected {}, got {}",
            expected,
            pixels.len()
        ));
    }

    let mut rgba = vec![0u8; y_plane * BYTES_PER_PIXEL];
    for j in 0..h {
        for i in 0..w {
            let y = pixels[j * w + i] as f32;
            let uv_index = y_plane + (j / 2) * w + (i / 2) * 2;
            let u = pixels[uv_index] as f32 - 128.0;
            let v = pixels[uv_index + 1] as f32 - 128.0;

            let [r, g, b] = yuv_to_rgb(y, u, v);
            let offset = (j * w + i) * BYTES_PER_PIXEL;
            rgba[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&[r, g, b, 255]);
        }
    }

    Ok(rgba)
}

fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    let r = y + 1.402_f32 * v;
    let g = y - 0.344_136_f32 * u - 0.714_136_f32 * v;
    let b = y + 1.772_f32 * u;
    [clamp_to_u8(r), clamp_to_u8(g), clamp_to_u8(b)]
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
