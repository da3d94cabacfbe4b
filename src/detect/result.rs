use serde::{Deserialize, Serialize};

use crate::scan::ScanMode;

/// Side length of every detection box, in pixels. Also the merge radius.
pub const DETECTION_SIZE: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionKind {
    /// Optical glint, possibly a lens.
    Camera,
    /// Infrared emitter as seen by the sensor.
    Ir,
}

impl DetectionKind {
    pub fn label(self) -> &'static str {
        match self {
            DetectionKind::Camera => "CAMERA",
            DetectionKind::Ir => "IR",
        }
    }
}

/// Rectangle in image pixel coordinates. `x, y` is the sampled point the
/// detection was anchored on; the box is centered there when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Location {
    pub const ZERO: Location = Location {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Fixed-size detection box anchored at `(x, y)`.
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            width: DETECTION_SIZE,
            height: DETECTION_SIZE,
        }
    }

    pub fn distance_to(&self, x: u32, y: u32) -> f32 {
        let dx = self.x as f32 - x as f32;
        let dy = self.y as f32 - y as f32;
        dx.hypot(dy)
    }

    /// True when `other`'s anchor is strictly closer than `radius`.
    pub fn is_near(&self, other: &Location, radius: f32) -> bool {
        self.distance_to(other.x, other.y) < radius
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "type")]
    pub kind: DetectionKind,
    pub location: Location,
    /// Linear remap of brightness above threshold, in (0, 1].
    pub confidence: f32,
}

/// Outcome of analyzing one frame. Serializes with the field names the
/// results panel and JSON consumers expect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    /// Wall-clock time of the analysis call, epoch milliseconds.
    pub timestamp: u64,
    /// Highest detection confidence, 0 when there are none.
    pub confidence: f32,
    pub optical_detection: bool,
    pub ir_detection: bool,
    pub scan_mode: ScanMode,
}

impl DetectionResult {
    pub fn from_detections(detections: Vec<Detection>, scan_mode: ScanMode, timestamp: u64) -> Self {
        let confidence = detections
            .iter()
            .map(|d| d.confidence)
            .fold(0.0_f32, f32::max);
        let optical_detection = detections.iter().any(|d| d.kind == DetectionKind::Camera);
        let ir_detection = detections.iter().any(|d| d.kind == DetectionKind::Ir);
        Self {
            detections,
            timestamp,
            confidence,
            optical_detection,
            ir_detection,
            scan_mode,
        }
    }

    /// "Nothing found" result.
    pub fn clear(scan_mode: ScanMode, timestamp: u64) -> Self {
        Self::from_detections(Vec::new(), scan_mode, timestamp)
    }

    pub fn is_clear(&self) -> bool {
        self.detections.is_empty()
    }

    /// Equality on everything except the timestamp.
    pub fn same_findings(&self, other: &DetectionResult) -> bool {
        self.scan_mode == other.scan_mode
            && self.confidence == other.confidence
            && self.optical_detection == other.optical_detection
            && self.ir_detection == other.ir_detection
            && self.detections == other.detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(kind: DetectionKind, x: u32, confidence: f32) -> Detection {
        Detection {
            kind,
            location: Location::at(x, 0),
            confidence,
        }
    }

    #[test]
    fn aggregates_max_confidence_and_flags() {
        let result = DetectionResult::from_detections(
            vec![
                detection(DetectionKind::Camera, 0, 0.4),
                detection(DetectionKind::Camera, 40, 0.9),
            ],
            ScanMode::Advanced,
            7,
        );
        assert_eq!(result.confidence, 0.9);
        assert!(result.optical_detection);
        assert!(!result.ir_detection);
        assert_eq!(result.timestamp, 7);
    }

    #[test]
    fn clear_result_has_zero_confidence() {
        let result = DetectionResult::clear(ScanMode::Ir, 1);
        assert!(result.is_clear());
        assert_eq!(result.confidence, 0.0);
        assert!(!result.optical_detection);
        assert!(!result.ir_detection);
        assert_eq!(result.scan_mode, ScanMode::Ir);
    }

    #[test]
    fn same_findings_ignores_timestamp() {
        let a = DetectionResult::from_detections(
            vec![detection(DetectionKind::Ir, 8, 1.0)],
            ScanMode::Ir,
            100,
        );
        let mut b = a.clone();
        b.timestamp = 200;
        assert!(a.same_findings(&b));
        b.detections[0].confidence = 0.5;
        assert!(!a.same_findings(&b));
    }

    #[test]
    fn serializes_with_original_field_names() -> anyhow::Result<()> {
        let result = DetectionResult::from_detections(
            vec![detection(DetectionKind::Camera, 4, 0.5)],
            ScanMode::Basic,
            42,
        );
        let json = serde_json::to_value(&result)?;
        assert_eq!(json["scanMode"], "basic");
        assert_eq!(json["opticalDetection"], true);
        assert_eq!(json["irDetection"], false);
        assert_eq!(json["timestamp"], 42);
        assert_eq!(json["detections"][0]["type"], "camera");
        assert_eq!(json["detections"][0]["location"]["width"], 20);
        Ok(())
    }

    #[test]
    fn nearness_is_strict() {
        let a = Location::at(0, 0);
        assert!(a.is_near(&Location::at(19, 0), 20.0));
        assert!(!a.is_near(&Location::at(20, 0), 20.0));
        assert!(!a.is_near(&Location::at(12, 16), 20.0));
    }
}
