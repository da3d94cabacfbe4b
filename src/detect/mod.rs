mod analyzer;
mod backend;
pub mod cluster;
mod result;
pub mod sampler;

pub use analyzer::{analyze_frame, now_millis, FrameAnalyzer};
pub use backend::{DetectorBackend, GlintBackend};
pub use cluster::{cluster, Clusterer, MIN_SEPARATION};
pub use result::{Detection, DetectionKind, DetectionResult, Location, DETECTION_SIZE};
pub use sampler::{sample, BrightSpots, Candidate, SAMPLE_STEP};
