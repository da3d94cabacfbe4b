//! Still-image frame source.
//!
//! This module provides `ImageSource` for sweeping recorded stills:
//! - A single image file yields one frame
//! - A directory yields its png/jpeg files in name order
//! - With looping enabled, playback restarts after the last file
//!
//! Decoding happens in memory through the `image` crate; every frame is
//! converted to RGBA before it leaves the source.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use super::SourceStats;
use crate::frame::RgbaFrame;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub struct ImageSource {
    path: PathBuf,
    loop_playback: bool,
    files: Vec<PathBuf>,
    cursor: usize,
    frames_captured: u64,
    last_error: Option<String>,
}

impl ImageSource {
    pub fn new<P: AsRef<Path>>(path: P, loop_playback: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            loop_playback,
            files: Vec::new(),
            cursor: 0,
            frames_captured: 0,
            last_error: None,
        }
    }

    /// Resolve the file list.
    pub fn connect(&mut self) -> Result<()> {
        let files = if self.path.is_dir() {
            list_images(&self.path)?
        } else if self.path.is_file() {
            vec![self.path.clone()]
        } else {
            return Err(anyhow!("no such image file or directory: {}", self.path.display()));
        };
        if files.is_empty() {
            return Err(anyhow!("no png/jpeg images found in {}", self.path.display()));
        }
        log::info!(
            "ImageSource: connected to {} ({} images, loop={})",
            self.path.display(),
            files.len(),
            self.loop_playback
        );
        self.files = files;
        self.cursor = 0;
        self.last_error = None;
        Ok(())
    }

    /// Decode the next image. `Ok(None)` once playback is over.
    pub fn next_frame(&mut self) -> Result<Option<RgbaFrame>> {
        if self.files.is_empty() {
            return Err(anyhow!("image source not connected"));
        }
        if self.cursor >= self.files.len() {
            if !self.loop_playback {
                return Ok(None);
            }
            self.cursor = 0;
        }
        let path = self.files[self.cursor].clone();
        self.cursor += 1;

        let decoded = image::open(&path).with_context(|| format!("decode {}", path.display()));
        let image = match decoded {
            Ok(image) => image,
            Err(e) => {
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };
        self.last_error = None;
        self.frames_captured += 1;
        Ok(Some(
            RgbaFrame::from_image(image.to_rgba8()).with_sequence(self.frames_captured),
        ))
    }

    pub fn is_healthy(&self) -> bool {
        self.last_error.is_none()
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frames_captured,
            uri: self.path.display().to_string(),
        }
    }
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_image && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, level: u8) -> Result<PathBuf> {
        let path = dir.join(name);
        RgbaImage::from_pixel(8, 8, Rgba([level, level, level, 255])).save(&path)?;
        Ok(path)
    }

    #[test]
    fn plays_directory_in_name_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_png(dir.path(), "b.png", 200)?;
        write_png(dir.path(), "a.png", 100)?;
        std::fs::write(dir.path().join("notes.txt"), "not an image")?;

        let mut source = ImageSource::new(dir.path(), false);
        source.connect()?;
        let first = source.next_frame()?.ok_or_else(|| anyhow!("first frame"))?;
        let second = source.next_frame()?.ok_or_else(|| anyhow!("second frame"))?;
        assert_eq!(first.pixel(0, 0), Some([100, 100, 100, 255]));
        assert_eq!(second.pixel(0, 0), Some([200, 200, 200, 255]));
        assert!(source.next_frame()?.is_none());
        assert_eq!(source.stats().frames_captured, 2);
        Ok(())
    }

    #[test]
    fn looping_restarts_playback() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_png(dir.path(), "only.png", 50)?;
        let mut source = ImageSource::new(&path, true);
        source.connect()?;
        for expected in 1..=3 {
            let frame = source.next_frame()?.ok_or_else(|| anyhow!("frame"))?;
            assert_eq!(frame.sequence, expected);
        }
        Ok(())
    }

    #[test]
    fn empty_directory_fails_to_connect() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut source = ImageSource::new(dir.path(), false);
        assert!(source.connect().is_err());
        Ok(())
    }

    #[test]
    fn undecodable_file_marks_source_unhealthy() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("broken.png"), b"not a png")?;
        let mut source = ImageSource::new(dir.path(), false);
        source.connect()?;
        assert!(source.next_frame().is_err());
        assert!(!source.is_healthy());
        assert!(source.next_frame()?.is_none());
        Ok(())
    }
}
