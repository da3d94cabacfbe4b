use anyhow::Result;

use crate::detect::cluster::cluster;
use crate::detect::result::Detection;
use crate::detect::sampler::BrightSpots;
use crate::scan::ScanMode;

/// Detector backend trait.
///
/// The analyzer calls exactly one backend per frame. Backends may fail; the
/// analyzer turns a failure into a clear result, so implementations should
/// return errors rather than guess at malformed input.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on an RGBA frame.
    ///
    /// Implementations must treat the pixel slice as read-only and must not
    /// keep it beyond the call.
    fn detect(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: ScanMode,
    ) -> Result<Vec<Detection>>;
}

/// Bright-spot backend: stride sampling followed by greedy clustering.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlintBackend;

impl GlintBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DetectorBackend for GlintBackend {
    fn name(&self) -> &'static str {
        "glint"
    }

    fn detect(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: ScanMode,
    ) -> Result<Vec<Detection>> {
        let spots = BrightSpots::new(pixels, width, height, mode)?;
        Ok(cluster(spots, mode.detection_kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::DetectionKind;
    use crate::frame::RgbaFrame;

    #[test]
    fn glint_backend_tags_by_mode() -> Result<()> {
        let mut frame = RgbaFrame::filled(16, 16, [0, 0, 0]);
        frame.set_pixel(4, 4, [255, 255, 255, 255]);

        let mut backend = GlintBackend::new();
        let ir = backend.detect(frame.pixels(), 16, 16, ScanMode::Ir)?;
        assert_eq!(ir.len(), 1);
        assert_eq!(ir[0].kind, DetectionKind::Ir);

        let camera = backend.detect(frame.pixels(), 16, 16, ScanMode::Basic)?;
        assert_eq!(camera[0].kind, DetectionKind::Camera);
        Ok(())
    }

    #[test]
    fn glint_backend_rejects_malformed_frames() {
        let mut backend = GlintBackend::new();
        assert!(backend.detect(&[1, 2, 3], 4, 4, ScanMode::Basic).is_err());
    }
}
