//! Detection overlay.
//!
//! Draws each detection onto a transparent RGBA layer the size of the frame:
//! a box outline centered on the anchor, a confidence bar under it, and a
//! `TYPE (NN%)` label above it. Pixels are overwritten, never blended, so
//! drawing the same detections twice yields the same layer.

pub mod font;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detect::{Detection, DetectionKind};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const LABEL_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Clone, Debug)]
pub struct OverlayRenderer {
    /// Box outline thickness, drawn inward.
    pub line_width: u32,
    /// Bar width at confidence 1.0.
    pub bar_width: u32,
    pub bar_height: u32,
    /// Gap between box bottom and bar.
    pub bar_gap: u32,
    /// Gap between label bottom and box top.
    pub label_gap: u32,
    pub text_scale: u32,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self {
            line_width: 2,
            bar_width: 30,
            bar_height: 4,
            bar_gap: 5,
            label_gap: 5,
            text_scale: 2,
        }
    }
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every detection onto `target`.
    pub fn render(&self, target: &mut RgbaImage, detections: &[Detection]) {
        for detection in detections {
            self.draw_detection(target, detection);
        }
    }

    /// Clear `target` and draw `detections`.
    pub fn redraw(&self, target: &mut RgbaImage, detections: &[Detection]) {
        clear(target);
        self.render(target, detections);
    }

    fn draw_detection(&self, target: &mut RgbaImage, detection: &Detection) {
        let color = color_for(detection.kind, detection.confidence);
        let loc = detection.location;
        let left = loc.x as i32 - (loc.width / 2) as i32;
        let top = loc.y as i32 - (loc.height / 2) as i32;

        for t in 0..self.line_width {
            let w = loc.width.saturating_sub(2 * t);
            let h = loc.height.saturating_sub(2 * t);
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at(left + t as i32, top + t as i32).of_size(w, h);
            draw_hollow_rect_mut(target, rect, color);
        }

        let bar_len = ((self.bar_width as f32 * detection.confidence).round() as u32).max(1);
        if self.bar_height > 0 {
            let bar = Rect::at(
                loc.x as i32 - (self.bar_width / 2) as i32,
                top + loc.height as i32 + self.bar_gap as i32,
            )
            .of_size(bar_len, self.bar_height);
            draw_filled_rect_mut(target, bar, color);
        }

        let text = label(detection);
        let text_w = font::text_width(&text, self.text_scale) as i32;
        let text_x = loc.x as i32 - text_w / 2;
        let text_y = top - self.label_gap as i32 - font::text_height(self.text_scale) as i32;
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            font::draw_text(
                target,
                text_x + dx,
                text_y + dy,
                &text,
                self.text_scale,
                LABEL_OUTLINE,
            );
        }
        font::draw_text(target, text_x, text_y, &text, self.text_scale, LABEL_FILL);
    }
}

/// Reset every pixel to fully transparent.
pub fn clear(target: &mut RgbaImage) {
    for pixel in target.pixels_mut() {
        *pixel = TRANSPARENT;
    }
}

/// Green for optical glints, cyan for IR; opacity grows from 0.3 at zero
/// confidence to 1.0 at full confidence.
pub fn color_for(kind: DetectionKind, confidence: f32) -> Rgba<u8> {
    let alpha = ((0.3 + 0.7 * confidence.clamp(0.0, 1.0)) * 255.0).round() as u8;
    match kind {
        DetectionKind::Camera => Rgba([0, 255, 0, alpha]),
        DetectionKind::Ir => Rgba([0, 255, 255, alpha]),
    }
}

/// `CAMERA (87%)` style label.
pub fn label(detection: &Detection) -> String {
    format!(
        "{} ({}%)",
        detection.kind.label(),
        (detection.confidence * 100.0).round() as u32
    )
}
