//! Frame analyzer.
//!
//! Runs one backend per frame and folds its detections into a
//! `DetectionResult`. Failures never reach the caller: a malformed frame or a
//! backend error is logged and reported as a clear scan, so a "clear" result
//! is not proof that nothing is there.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::detect::backend::{DetectorBackend, GlintBackend};
use crate::detect::result::DetectionResult;
use crate::frame::RgbaFrame;
use crate::scan::ScanMode;

pub struct FrameAnalyzer {
    backend: Box<dyn DetectorBackend>,
    frames_analyzed: u64,
    failures: u64,
}

impl FrameAnalyzer {
    pub fn new() -> Self {
        Self::with_backend(GlintBackend::new())
    }

    pub fn with_backend<B: DetectorBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
            frames_analyzed: 0,
            failures: 0,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn analyze(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: ScanMode,
    ) -> DetectionResult {
        self.frames_analyzed += 1;
        let detections = match self.backend.detect(pixels, width, height, mode) {
            Ok(detections) => detections,
            Err(e) => {
                self.failures += 1;
                log::error!(
                    "analysis error ({} backend, {}x{}, mode={}): {:#}",
                    self.backend.name(),
                    width,
                    height,
                    mode,
                    e
                );
                return DetectionResult::clear(mode, now_millis());
            }
        };
        DetectionResult::from_detections(detections, mode, now_millis())
    }

    pub fn analyze_frame(&mut self, frame: &RgbaFrame, mode: ScanMode) -> DetectionResult {
        self.analyze(frame.pixels(), frame.width, frame.height, mode)
    }

    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }

    /// Frames that degraded to a clear result because analysis failed.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze one RGBA buffer with the bright-spot backend.
pub fn analyze_frame(pixels: &[u8], width: u32, height: u32, mode: ScanMode) -> DetectionResult {
    FrameAnalyzer::new().analyze(pixels, width, height, mode)
}

/// Current wall-clock time in epoch milliseconds. A clock before the epoch
/// reads as 0.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::Detection;
    use anyhow::{anyhow, Result};

    struct BrokenBackend;

    impl DetectorBackend for BrokenBackend {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn detect(&mut self, _: &[u8], _: u32, _: u32, _: ScanMode) -> Result<Vec<Detection>> {
            Err(anyhow!("unexpected pixel format"))
        }
    }

    #[test]
    fn backend_failure_degrades_to_clear_result() {
        let mut analyzer = FrameAnalyzer::with_backend(BrokenBackend);
        let frame = RgbaFrame::filled(8, 8, [255, 255, 255]);
        let result = analyzer.analyze_frame(&frame, ScanMode::Advanced);

        assert!(result.is_clear());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.scan_mode, ScanMode::Advanced);
        assert_eq!(analyzer.failures(), 1);
        assert_eq!(analyzer.frames_analyzed(), 1);
    }

    #[test]
    fn timestamp_is_wall_clock() {
        let before = now_millis();
        let result = analyze_frame(&[0u8; 64], 4, 4, ScanMode::Basic);
        let after = now_millis();
        assert!(result.timestamp >= before && result.timestamp <= after);
    }
}
