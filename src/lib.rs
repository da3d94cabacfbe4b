//! Glint Sweep
//!
//! Scans camera frames for the tell-tale glints of hidden cameras: lens
//! reflections and infrared LEDs show up as small, very bright spots.
//!
//! # Pipeline
//!
//! 1. An ingest source hands out RGBA frames (`ingest`).
//! 2. The analyzer samples every fourth pixel, keeps the ones brighter than
//!    the mode's threshold and groups them into detections (`detect`).
//! 3. The session keeps the latest result, notifies listeners when it
//!    changes and redraws the overlay (`session`, `overlay`, `panel`).
//! 4. The capture loop drives the whole thing at a fixed rate (`capture`).
//!
//! Wireless scanning is a placeholder (`wireless`): at most one simulated
//! paired device is reported, never a real measurement.
//!
//! # Module Structure
//!
//! - `scan`: scan modes and their thresholds
//! - `frame`: RGBA frame buffers
//! - `detect`: sampling, clustering, analyzer and result types
//! - `overlay`: box, confidence bar and label rendering
//! - `session`: scanning state machine and change notifications
//! - `history`: bounded log of recent detections
//! - `config`: file and environment configuration

pub mod capture;
pub mod config;
pub mod detect;
pub mod frame;
pub mod history;
pub mod ingest;
pub mod overlay;
pub mod panel;
pub mod scan;
pub mod session;
pub mod wireless;

pub use capture::{CaptureLoop, FramePacer, LoopSummary, StopReason};
pub use config::SweepConfig;
pub use detect::{
    analyze_frame, Detection, DetectionKind, DetectionResult, DetectorBackend, FrameAnalyzer,
    GlintBackend, Location, DETECTION_SIZE,
};
pub use frame::RgbaFrame;
pub use history::{HistoryEntry, ScanHistory};
pub use ingest::{acquire, CaptureSettings, FrameSource};
pub use overlay::OverlayRenderer;
pub use panel::{PanelFormat, ResultsPanel};
pub use scan::ScanMode;
pub use session::{FrameRequest, ResultListener, ScanSession, TickOutcome};
pub use wireless::{
    scan_rf_signals, select_scanner, RfSignal, Signal, WirelessMode, WirelessScanner,
    WirelessSettings,
};
