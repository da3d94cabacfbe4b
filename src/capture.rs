//! Capture loop.
//!
//! Pulls one frame at a time from a source and hands it to the session.
//! A frame is captured, analyzed and rendered before the next is pulled;
//! nothing overlaps. The pacer holds the loop to the target frame rate.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::ingest::FrameSource;
use crate::session::ScanSession;

/// Sleeps away whatever is left of each frame interval.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    last: Option<Instant>,
}

impl FramePacer {
    /// A rate of 0 disables pacing.
    pub fn new(target_fps: u32) -> Self {
        let interval = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(1_000_000_000 / target_fps as u64)
        };
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next frame is due.
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Why the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was raised (Ctrl-C).
    Interrupted,
    /// The session stopped scanning.
    SessionStopped,
    SourceExhausted,
    FrameLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames_read: u64,
    pub frames_analyzed: u64,
    pub source_errors: u64,
    pub reason: StopReason,
}

pub struct CaptureLoop {
    pacer: FramePacer,
    stop: Arc<AtomicBool>,
    max_frames: Option<u64>,
    overlay_path: Option<PathBuf>,
    health_log_interval: Duration,
}

impl CaptureLoop {
    pub fn new(target_fps: u32) -> Self {
        Self {
            pacer: FramePacer::new(target_fps),
            stop: Arc::new(AtomicBool::new(false)),
            max_frames: None,
            overlay_path: None,
            health_log_interval: Duration::from_secs(5),
        }
    }

    /// Stop after this many frames have been read.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Save the overlay as PNG whenever the result changes.
    pub fn with_overlay_path(mut self, path: PathBuf) -> Self {
        self.overlay_path = Some(path);
        self
    }

    /// Flag that ends the loop when set, e.g. from a Ctrl-C handler.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run until interrupted, exhausted or stopped. The session is stopped on
    /// return, which clears its overlay.
    pub fn run(&mut self, source: &mut FrameSource, session: &mut ScanSession) -> Result<LoopSummary> {
        session.start();
        let mut frames_read = 0u64;
        let mut source_errors = 0u64;
        let mut last_health_log = Instant::now();

        let reason = loop {
            if self.stop.load(Ordering::SeqCst) {
                break StopReason::Interrupted;
            }
            if !session.is_scanning() {
                break StopReason::SessionStopped;
            }
            if self.max_frames.is_some_and(|max| frames_read >= max) {
                break StopReason::FrameLimit;
            }

            self.pacer.wait();

            match source.next_frame() {
                Ok(Some(frame)) => {
                    frames_read += 1;
                    if let Some(outcome) = session.tick(&frame) {
                        if outcome.changed {
                            self.save_overlay(session);
                        }
                    }
                }
                Ok(None) => break StopReason::SourceExhausted,
                Err(e) => {
                    source_errors += 1;
                    log::error!("capture error: {:#}", e);
                }
            }

            if last_health_log.elapsed() >= self.health_log_interval {
                let stats = source.stats();
                log::info!(
                    "source health={} frames={} uri={}",
                    source.is_healthy(),
                    stats.frames_captured,
                    stats.uri
                );
                last_health_log = Instant::now();
            }
        };

        let frames_analyzed = session.stats().frames_analyzed;
        session.stop();
        log::info!(
            "capture loop ended ({:?}): {} frames read, {} analyzed, {} source errors",
            reason,
            frames_read,
            frames_analyzed,
            source_errors
        );
        Ok(LoopSummary {
            frames_read,
            frames_analyzed,
            source_errors,
            reason,
        })
    }

    fn save_overlay(&self, session: &ScanSession) {
        let Some(path) = &self.overlay_path else {
            return;
        };
        if let Err(e) = session
            .overlay()
            .save(path)
            .with_context(|| format!("write overlay {}", path.display()))
        {
            log::warn!("{:#}", e);
        }
    }
}
