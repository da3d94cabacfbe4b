//! Results panel.
//!
//! A session listener that prints each changed result, either as one JSON
//! object per line or as a short human-readable summary.

use std::io::Write;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::detect::DetectionResult;
use crate::session::ResultListener;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for PanelFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(PanelFormat::Text),
            "json" => Ok(PanelFormat::Json),
            other => Err(anyhow!("unknown panel format '{}' (expected text or json)", other)),
        }
    }
}

pub struct ResultsPanel<W: Write> {
    out: W,
    format: PanelFormat,
}

impl<W: Write> ResultsPanel<W> {
    pub fn new(out: W, format: PanelFormat) -> Self {
        Self { out, format }
    }

    pub fn write_result(&mut self, result: &DetectionResult) -> Result<()> {
        match self.format {
            PanelFormat::Json => {
                serde_json::to_writer(&mut self.out, result)?;
                writeln!(self.out)?;
            }
            PanelFormat::Text => {
                for line in summarize(result) {
                    writeln!(self.out, "{}", line)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultListener for ResultsPanel<W> {
    fn on_result(&mut self, result: &DetectionResult) {
        if let Err(e) = self.write_result(result) {
            log::warn!("results panel write failed: {:#}", e);
        }
    }
}

/// Human-readable summary lines for one result.
pub fn summarize(result: &DetectionResult) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] mode: {} ({} detections)",
        result.timestamp,
        result.scan_mode.label(),
        result.detections.len()
    )];
    if result.optical_detection {
        lines.push(format!(
            "  camera detected: potential hidden camera, {:.1}% confidence",
            result.confidence * 100.0
        ));
    }
    if result.ir_detection {
        lines.push("  IR signal detected: possible hidden camera indicator".to_string());
    }
    for detection in &result.detections {
        lines.push(format!(
            "    {} at ({}, {}), confidence {:.1}%",
            detection.kind.label(),
            detection.location.x,
            detection.location.y,
            detection.confidence * 100.0
        ));
    }
    if result.is_clear() {
        lines.push(format!(
            "  area clear: no suspicious signals in {} mode",
            result.scan_mode
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Detection, DetectionKind, Location};
    use crate::scan::ScanMode;

    fn ir_result() -> DetectionResult {
        DetectionResult::from_detections(
            vec![Detection {
                kind: DetectionKind::Ir,
                location: Location::at(8, 12),
                confidence: 0.5,
            }],
            ScanMode::Ir,
            1_000,
        )
    }

    #[test]
    fn text_summary_lists_detections() {
        let lines = summarize(&ir_result());
        assert_eq!(lines[0], "[1000] mode: IR Detection (1 detections)");
        assert!(lines.iter().any(|l| l.contains("IR signal detected")));
        assert!(lines.iter().any(|l| l.contains("IR at (8, 12), confidence 50.0%")));
        assert!(!lines.iter().any(|l| l.contains("area clear")));
    }

    #[test]
    fn clear_result_reports_area_clear() {
        let lines = summarize(&DetectionResult::clear(ScanMode::Basic, 5));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("area clear"));
    }

    #[test]
    fn json_panel_writes_one_line_per_result() -> Result<()> {
        let mut panel = ResultsPanel::new(Vec::new(), PanelFormat::Json);
        panel.on_result(&ir_result());
        panel.on_result(&DetectionResult::clear(ScanMode::Ir, 6));
        let out = String::from_utf8(panel.into_inner())?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(first["irDetection"], true);
        assert_eq!(first["detections"][0]["type"], "ir");
        Ok(())
    }
}
