//! Synthetic room scenes.
//!
//! `stub://<scene>` sources render a dim, noisy room with a few bright
//! glints. The noise is seeded, so a given scene always produces the same
//! frame sequence.
//!
//! Scenes:
//! - `dark` / `clear`: background only
//! - anything else (`room`): a steady lens glint and a blinking IR LED

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CaptureSettings, SourceStats};
use crate::frame::{RgbaFrame, BYTES_PER_PIXEL};

const NOISE_SEED: u64 = 0x5eed_0f_9117;
const BACKGROUND_LEVEL: u8 = 30;
const NOISE_SPAN: u8 = 24;

/// A bright disk drawn into every frame (or every other `blink_period`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glint {
    pub x: u32,
    pub y: u32,
    pub radius: u32,
    /// Gray level of the disk.
    pub level: u8,
    /// Frames on, then frames off. 0 means always on.
    pub blink_period: u64,
}

impl Glint {
    fn visible(&self, frame: u64) -> bool {
        self.blink_period == 0 || (frame / self.blink_period) % 2 == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntheticScene {
    pub glints: Vec<Glint>,
}

impl SyntheticScene {
    pub fn named(name: &str, width: u32, height: u32) -> Self {
        match name {
            "dark" | "clear" => Self::default(),
            _ => Self {
                glints: vec![
                    Glint {
                        x: width / 4,
                        y: height / 2,
                        radius: 3,
                        level: 250,
                        blink_period: 0,
                    },
                    Glint {
                        x: width * 3 / 4,
                        y: height / 3,
                        radius: 4,
                        level: 215,
                        blink_period: 15,
                    },
                ],
            },
        }
    }
}

pub struct SyntheticSource {
    settings: CaptureSettings,
    scene: SyntheticScene,
    frame_count: u64,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(settings: CaptureSettings) -> Self {
        let name = settings.uri.trim_start_matches("stub://").to_string();
        let scene = SyntheticScene::named(&name, settings.width, settings.height);
        Self::with_scene(settings, scene)
    }

    pub fn with_scene(settings: CaptureSettings, scene: SyntheticScene) -> Self {
        Self {
            settings,
            scene,
            frame_count: 0,
            rng: StdRng::seed_from_u64(NOISE_SEED),
        }
    }

    /// Synthetic sources are always "connected".
    pub fn connect(&mut self) -> Result<()> {
        log::info!(
            "SyntheticSource: connected to {} ({}x{}, {} glints)",
            self.settings.uri,
            self.settings.width,
            self.settings.height,
            self.scene.glints.len()
        );
        Ok(())
    }

    pub fn next_frame(&mut self) -> Result<RgbaFrame> {
        self.frame_count += 1;
        let mut frame = self.render_background();
        for glint in &self.scene.glints {
            if glint.visible(self.frame_count) {
                draw_disk(&mut frame, glint);
            }
        }
        Ok(frame.with_sequence(self.frame_count))
    }

    fn render_background(&mut self) -> RgbaFrame {
        let (width, height) = (self.settings.width, self.settings.height);
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            let level = BACKGROUND_LEVEL + self.rng.gen_range(0..NOISE_SPAN);
            data.extend_from_slice(&[level, level, level.saturating_add(4), 255]);
        }
        RgbaFrame::new(data, width, height)
    }

    pub fn scene(&self) -> &SyntheticScene {
        &self.scene
    }

    pub fn is_healthy(&self) -> bool {
        true
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            uri: self.settings.uri.clone(),
        }
    }
}

fn draw_disk(frame: &mut RgbaFrame, glint: &Glint) {
    let r = glint.radius as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let x = glint.x as i64 + dx;
            let y = glint.y as i64 + dy;
            if x < 0 || y < 0 {
                continue;
            }
            frame.set_pixel(
                x as u32,
                y as u32,
                [glint.level, glint.level, glint.level, 255],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(uri: &str) -> CaptureSettings {
        CaptureSettings {
            uri: uri.to_string(),
            width: 64,
            height: 48,
            ..CaptureSettings::default()
        }
    }

    #[test]
    fn synthetic_source_produces_sequenced_frames() -> Result<()> {
        let mut source = SyntheticSource::new(settings("stub://room"));
        source.connect()?;
        let first = source.next_frame()?;
        let second = source.next_frame()?;
        first.validate()?;
        assert_eq!((first.width, first.height), (64, 48));
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(source.stats().frames_captured, 2);
        Ok(())
    }

    #[test]
    fn same_scene_replays_identically() -> Result<()> {
        let mut a = SyntheticSource::new(settings("stub://room"));
        let mut b = SyntheticSource::new(settings("stub://room"));
        assert_eq!(a.next_frame()?, b.next_frame()?);
        Ok(())
    }

    #[test]
    fn room_scene_draws_lens_glint() -> Result<()> {
        let mut source = SyntheticSource::new(settings("stub://room"));
        let frame = source.next_frame()?;
        assert_eq!(frame.pixel(16, 24), Some([250, 250, 250, 255]));
        Ok(())
    }

    #[test]
    fn dark_scene_has_no_glints() {
        let source = SyntheticSource::new(settings("stub://dark"));
        assert!(source.scene().glints.is_empty());
    }

    #[test]
    fn blinking_glint_alternates() {
        let glint = Glint {
            x: 0,
            y: 0,
            radius: 1,
            level: 255,
            blink_period: 2,
        };
        assert!(glint.visible(0));
        assert!(glint.visible(1));
        assert!(!glint.visible(2));
        assert!(!glint.visible(3));
        assert!(glint.visible(4));
    }
}
