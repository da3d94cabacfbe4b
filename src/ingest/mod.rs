//! Frame sources.
//!
//! This module provides the sources a sweep can read frames from:
//! - Synthetic room scenes (`stub://<scene>`), for demos and tests
//! - Still images, a single file or a directory played in name order
//! - USB/V4L2 devices (feature: ingest-v4l2)
//!
//! Every source hands out `RgbaFrame`s. Acquiring a source is the only step
//! allowed to fail loudly; `acquire` logs the failure and the sweep simply
//! does not start.

pub mod file;
#[cfg(any(feature = "ingest-v4l2", test))]
mod normalize;
pub mod synthetic;
#[cfg(feature = "ingest-v4l2")]
pub mod v4l2;

use anyhow::{anyhow, Result};

use crate::frame::RgbaFrame;

pub use file::ImageSource;
pub use synthetic::{Glint, SyntheticScene, SyntheticSource};
#[cfg(feature = "ingest-v4l2")]
pub use v4l2::V4l2Source;

const DEFAULT_CAPTURE_URI: &str = "stub://room";
const DEFAULT_CAPTURE_FPS: u32 = 15;
const DEFAULT_CAPTURE_WIDTH: u32 = 640;
const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

/// Where frames come from and how fast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    /// `stub://<scene>`, an image file or directory, or `/dev/videoN`.
    pub uri: String,
    /// Target frame rate (frames per second).
    pub target_fps: u32,
    /// Frame width for synthetic and device sources.
    pub width: u32,
    /// Frame height for synthetic and device sources.
    pub height: u32,
    /// Restart image playback when the last file has been read.
    pub loop_playback: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_CAPTURE_URI.to_string(),
            target_fps: DEFAULT_CAPTURE_FPS,
            width: DEFAULT_CAPTURE_WIDTH,
            height: DEFAULT_CAPTURE_HEIGHT,
            loop_playback: false,
        }
    }
}

/// Statistics for a frame source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub uri: String,
}

pub struct FrameSource {
    backend: SourceBackend,
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    Images(ImageSource),
    #[cfg(feature = "ingest-v4l2")]
    Device(V4l2Source),
}

impl FrameSource {
    pub fn open(settings: &CaptureSettings) -> Result<Self> {
        let uri = settings.uri.trim();
        if uri.is_empty() {
            return Err(anyhow!("capture uri is empty"));
        }
        let backend = if uri.starts_with("stub://") {
            SourceBackend::Synthetic(SyntheticSource::new(settings.clone()))
        } else if uri.starts_with("/dev/video") {
            #[cfg(feature = "ingest-v4l2")]
            {
                SourceBackend::Device(V4l2Source::new(settings.clone())?)
            }
            #[cfg(not(feature = "ingest-v4l2"))]
            {
                anyhow::bail!("device capture requires the ingest-v4l2 feature")
            }
        } else if uri.contains("://") {
            return Err(anyhow!("unsupported capture uri '{}'", uri));
        } else {
            SourceBackend::Images(ImageSource::new(uri, settings.loop_playback))
        };
        Ok(Self { backend })
    }

    /// Connect to the underlying device, scene or files.
    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.connect(),
            SourceBackend::Images(source) => source.connect(),
            #[cfg(feature = "ingest-v4l2")]
            SourceBackend::Device(source) => source.connect(),
        }
    }

    /// Capture the next frame. `Ok(None)` means the source is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<RgbaFrame>> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.next_frame().map(Some),
            SourceBackend::Images(source) => source.next_frame(),
            #[cfg(feature = "ingest-v4l2")]
            SourceBackend::Device(source) => source.next_frame().map(Some),
        }
    }

    /// Check if the source is healthy.
    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.is_healthy(),
            SourceBackend::Images(source) => source.is_healthy(),
            #[cfg(feature = "ingest-v4l2")]
            SourceBackend::Device(source) => source.is_healthy(),
        }
    }

    pub fn stats(&self) -> SourceStats {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.stats(),
            SourceBackend::Images(source) => source.stats(),
            #[cfg(feature = "ingest-v4l2")]
            SourceBackend::Device(source) => source.stats(),
        }
    }
}

/// Open and connect a source. Failure is logged and capture does not start.
pub fn acquire(settings: &CaptureSettings) -> Option<FrameSource> {
    let opened = FrameSource::open(settings).and_then(|mut source| {
        source.connect()?;
        Ok(source)
    });
    match opened {
        Ok(source) => Some(source),
        Err(e) => {
            log::error!("camera access error ({}): {:#}", settings.uri, e);
            None
        }
    }
}
