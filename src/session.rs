//! Scan session controller.
//!
//! One session drives one capture loop. It owns every piece of per-scan
//! state: the scanning flag, the active scan mode, the pending next-frame
//! request, the last result used for change suppression, the overlay layer,
//! and the detection history.
//!
//! A frame is only analyzed when a request is pending. `stop` cancels the
//! request and clears the overlay before returning, so a frame that arrives
//! after stopping is ignored.

use image::RgbaImage;

use crate::detect::{DetectionResult, FrameAnalyzer};
use crate::frame::RgbaFrame;
use crate::history::ScanHistory;
use crate::overlay::{self, OverlayRenderer};
use crate::scan::ScanMode;

/// Receives results that differ from the previous one.
pub trait ResultListener {
    fn on_result(&mut self, result: &DetectionResult);
}

impl<F> ResultListener for F
where
    F: FnMut(&DetectionResult),
{
    fn on_result(&mut self, result: &DetectionResult) {
        self(result)
    }
}

/// Handle for the next frame the session will accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What one `tick` did.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub result: DetectionResult,
    /// True when listeners were notified.
    pub changed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_analyzed: u64,
    pub notifications: u64,
    pub frames_skipped: u64,
}

pub struct ScanSession {
    analyzer: FrameAnalyzer,
    renderer: OverlayRenderer,
    overlay: RgbaImage,
    mode: ScanMode,
    scanning: bool,
    pending: Option<FrameRequest>,
    next_request_id: u64,
    last_result: Option<DetectionResult>,
    listeners: Vec<Box<dyn ResultListener>>,
    history: ScanHistory,
    stats: SessionStats,
}

impl ScanSession {
    pub fn new(mode: ScanMode) -> Self {
        Self::with_analyzer(FrameAnalyzer::new(), mode)
    }

    pub fn with_analyzer(analyzer: FrameAnalyzer, mode: ScanMode) -> Self {
        Self {
            analyzer,
            renderer: OverlayRenderer::default(),
            overlay: RgbaImage::new(0, 0),
            mode,
            scanning: false,
            pending: None,
            next_request_id: 0,
            last_result: None,
            listeners: Vec::new(),
            history: ScanHistory::default(),
            stats: SessionStats::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: OverlayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_history(mut self, history: ScanHistory) -> Self {
        self.history = history;
        self
    }

    pub fn add_listener<L: ResultListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn start(&mut self) {
        if self.scanning {
            return;
        }
        self.scanning = true;
        self.history.clear();
        self.request_frame();
        log::info!("scan started (mode={})", self.mode);
    }

    /// Stop scanning. Cancels the pending frame, clears the overlay and
    /// forgets the last result before returning.
    pub fn stop(&mut self) {
        if !self.scanning {
            return;
        }
        self.scanning = false;
        self.pending = None;
        overlay::clear(&mut self.overlay);
        self.last_result = None;
        log::info!(
            "scan stopped after {} frames ({} notifications)",
            self.stats.frames_analyzed,
            self.stats.notifications
        );
    }

    pub fn toggle(&mut self) {
        if self.scanning {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Switch scan mode. While scanning, the pending request is replaced so
    /// the next frame is analyzed with the new parameters; the frame source
    /// keeps running.
    pub fn set_mode(&mut self, mode: ScanMode) {
        if mode == self.mode {
            return;
        }
        log::info!("scan mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.history.clear();
        if self.scanning {
            self.pending = None;
            self.request_frame();
        }
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next_request_id += 1;
        let request = FrameRequest(self.next_request_id);
        self.pending = Some(request);
        request
    }

    /// Analyze `frame` if a frame is wanted. Returns `None` when the session
    /// is stopped or no request is pending.
    pub fn tick(&mut self, frame: &RgbaFrame) -> Option<TickOutcome> {
        if !self.scanning {
            self.stats.frames_skipped += 1;
            return None;
        }
        let Some(request) = self.pending.take() else {
            self.stats.frames_skipped += 1;
            return None;
        };

        let result = self.analyzer.analyze_frame(frame, self.mode);
        self.stats.frames_analyzed += 1;
        log::debug!(
            "frame #{} (request {}): {} detections, confidence {:.2}",
            frame.sequence,
            request.id(),
            result.detections.len(),
            result.confidence
        );

        let changed = self
            .last_result
            .as_ref()
            .map_or(true, |last| !last.same_findings(&result));
        if changed {
            for listener in &mut self.listeners {
                listener.on_result(&result);
            }
            self.history.extend_from(&result.detections, result.timestamp);
            self.stats.notifications += 1;
            self.last_result = Some(result.clone());
        }

        match frame.validate() {
            Ok(()) => {
                if self.overlay.dimensions() != (frame.width, frame.height) {
                    self.overlay = RgbaImage::new(frame.width, frame.height);
                }
                self.renderer.redraw(&mut self.overlay, &result.detections);
            }
            // Malformed header: keep the layer's size, show nothing.
            Err(_) => overlay::clear(&mut self.overlay),
        }

        self.request_frame();
        Some(TickOutcome { result, changed })
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn last_result(&self) -> Option<&DetectionResult> {
        self.last_result.as_ref()
    }

    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn analyzer(&self) -> &FrameAnalyzer {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_ignored_until_started() {
        let mut session = ScanSession::new(ScanMode::Basic);
        let frame = RgbaFrame::filled(8, 8, [0, 0, 0]);
        assert!(session.tick(&frame).is_none());
        assert_eq!(session.stats().frames_skipped, 1);

        session.start();
        assert!(session.pending_request().is_some());
        assert!(session.tick(&frame).is_some());
    }

    #[test]
    fn each_tick_requests_a_fresh_frame() {
        let mut session = ScanSession::new(ScanMode::Basic);
        session.start();
        let first = session.pending_request();
        session.tick(&RgbaFrame::filled(4, 4, [0, 0, 0]));
        let second = session.pending_request();
        assert!(second.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn mode_change_replaces_pending_request() {
        let mut session = ScanSession::new(ScanMode::Basic);
        session.start();
        let before = session.pending_request();
        session.set_mode(ScanMode::Ir);
        let after = session.pending_request();
        assert!(after.is_some());
        assert_ne!(before, after);
        assert_eq!(session.mode(), ScanMode::Ir);
    }

    #[test]
    fn malformed_frame_keeps_overlay_size() {
        let mut session = ScanSession::new(ScanMode::Basic);
        session.start();
        let mut good = RgbaFrame::filled(32, 32, [0, 0, 0]);
        good.set_pixel(16, 16, [255, 255, 255, 255]);
        session.tick(&good);
        assert_eq!(session.overlay().dimensions(), (32, 32));

        let outcome = session
            .tick(&RgbaFrame::new(Vec::new(), u32::MAX, u32::MAX))
            .expect("frame requested");
        assert!(outcome.result.is_clear());
        assert_eq!(session.overlay().dimensions(), (32, 32));
        assert!(session.overlay().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
