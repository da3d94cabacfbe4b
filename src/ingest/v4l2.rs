//! V4L2 camera source.
//!
//! This module provides `V4l2Source` for sweeping with a local camera
//! (e.g. /dev/video0). It asks the driver for packed RGB and falls back to
//! YUYV, which nearly every UVC camera offers; both are converted to RGBA.
//!
//! V4L2 does not expose which way a camera faces, so picking the
//! room-facing camera means picking its device node.

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;
use std::time::{Duration, Instant};

use super::normalize::{normalize_to_rgba, PixelFormat};
use super::{CaptureSettings, SourceStats};
use crate::frame::RgbaFrame;

pub struct V4l2Source {
    settings: CaptureSettings,
    state: Option<DeviceState>,
    format: PixelFormat,
    frame_count: u64,
    last_frame_at: Option<Instant>,
    last_error: Option<String>,
    active_width: u32,
    active_height: u32,
}

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2Source {
    pub fn new(settings: CaptureSettings) -> Result<Self> {
        Ok(Self {
            active_width: settings.width,
            active_height: settings.height,
            settings,
            state: None,
            format: PixelFormat::Rgb24,
            frame_count: 0,
            last_frame_at: None,
            last_error: None,
        })
    }

    pub fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&self.settings.uri)
            .with_context(|| format!("open v4l2 device {}", self.settings.uri))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.width = self.settings.width;
        format.height = self.settings.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!(
                    "V4l2Source: failed to set RGB3 on {}: {}",
                    self.settings.uri,
                    err
                );
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };

        self.format = match &format.fourcc.repr {
            b"RGB3" => PixelFormat::Rgb24,
            b"YUYV" => PixelFormat::Yuyv,
            b"NV12" => PixelFormat::Nv12,
            other => {
                return Err(anyhow!(
                    "unsupported v4l2 pixel format {}",
                    String::from_utf8_lossy(other)
                ))
            }
        };

        if self.settings.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.settings.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!(
                    "V4l2Source: failed to set fps on {}: {}",
                    self.settings.uri,
                    err
                );
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;
        self.last_error = None;

        let state = DeviceStateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()
        .map_err(|err| {
            self.last_error = Some(err.to_string());
            err
        })?;
        self.state = Some(state);

        log::info!(
            "V4l2Source: connected to {} ({}x{}, {:?})",
            self.settings.uri,
            self.active_width,
            self.active_height,
            self.format
        );
        Ok(())
    }

    pub fn next_frame(&mut self) -> Result<RgbaFrame> {
        use v4l::io::traits::CaptureStream;

        let state = self.state.as_mut().context("v4l2 device not connected")?;
        let (buf, _meta) = state
            .with_mut(|fields| fields.stream.next())
            .map_err(|err| {
                self.last_error = Some(err.to_string());
                anyhow::Error::new(err).context("capture v4l2 frame")
            })?;

        let rgba = normalize_to_rgba(buf, self.active_width, self.active_height, self.format)?;

        self.frame_count += 1;
        self.last_frame_at = Some(Instant::now());

        Ok(RgbaFrame::new(rgba, self.active_width, self.active_height)
            .with_sequence(self.frame_count))
    }

    pub fn is_healthy(&self) -> bool {
        if self.last_error.is_some() {
            return false;
        }
        let Some(last_frame_at) = self.last_frame_at else {
            return true;
        };
        last_frame_at.elapsed() <= self.health_grace()
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            uri: self.settings.uri.clone(),
        }
    }

    fn health_grace(&self) -> Duration {
        let base_ms = if self.settings.target_fps == 0 {
            2_000
        } else {
            (1000 / self.settings.target_fps).saturating_mul(6)
        };
        Duration::from_millis(base_ms.max(2_000) as u64)
    }
}
