//! Tiny 3x5 bitmap font for overlay labels.
//!
//! Covers digits, the letters used by detection labels, parentheses, percent
//! and space. Anything else renders as a blank cell.

use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;
/// Blank columns between glyphs, before scaling.
const SPACING: u32 = 1;

/// Rows top to bottom; bit 2 is the leftmost column.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        _ => [0; 5],
    }
}

/// Rendered width of `text` in pixels at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    (n * (GLYPH_WIDTH + SPACING) - SPACING) * scale
}

pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

/// Draw `text` with its top-left corner at `(x, y)`. Pixels outside the image
/// are skipped.
pub fn draw_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, scale: u32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let scale = scale.max(1) as i32;
    let advance = (GLYPH_WIDTH + SPACING) as i32 * scale;

    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as i32 * advance;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH as i32 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = origin_x + col * scale + dx;
                        let py = y + row as i32 * scale + dy;
                        if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < h {
                            img.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_accounts_for_spacing_and_scale() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("1", 1), 3);
        assert_eq!(text_width("IR", 2), 14);
    }

    #[test]
    fn draws_glyph_pixels_and_clips() {
        let mut img = RgbaImage::new(4, 6);
        let white = Rgba([255, 255, 255, 255]);
        draw_text(&mut img, 0, 0, "I", 1, white);
        assert_eq!(img.get_pixel(0, 0), &white);
        assert_eq!(img.get_pixel(1, 2), &white);
        assert_eq!(img.get_pixel(0, 2), &Rgba([0, 0, 0, 0]));

        // Mostly off-canvas; must not panic.
        draw_text(&mut img, -5, -5, "100%", 3, white);
    }
}
