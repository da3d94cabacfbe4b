//! Scan modes.
//!
//! A scan mode is a global, per-frame preset: it fixes the brightness
//! threshold the sampler applies and the kind tag every detection in the
//! frame receives. Modes escalate in sensitivity: `basic` is the strictest,
//! `ir` the loosest.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::detect::DetectionKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Basic,
    Advanced,
    Ir,
}

impl ScanMode {
    /// Every mode, strictest first.
    pub const ALL: [ScanMode; 3] = [ScanMode::Basic, ScanMode::Advanced, ScanMode::Ir];

    /// Mean-RGB brightness a sample must strictly exceed.
    pub fn threshold(self) -> u8 {
        match self {
            ScanMode::Basic => 240,
            ScanMode::Advanced => 220,
            ScanMode::Ir => 200,
        }
    }

    /// Kind tag applied to every detection produced in this mode.
    pub fn detection_kind(self) -> DetectionKind {
        match self {
            ScanMode::Ir => DetectionKind::Ir,
            ScanMode::Basic | ScanMode::Advanced => DetectionKind::Camera,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanMode::Basic => "basic",
            ScanMode::Advanced => "advanced",
            ScanMode::Ir => "ir",
        }
    }

    /// Operator-facing name.
    pub fn label(self) -> &'static str {
        match self {
            ScanMode::Basic => "Basic Scan",
            ScanMode::Advanced => "Advanced Scan",
            ScanMode::Ir => "IR Detection",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(ScanMode::Basic),
            "advanced" => Ok(ScanMode::Advanced),
            "ir" => Ok(ScanMode::Ir),
            other => Err(anyhow!(
                "unknown scan mode '{}' (expected basic, advanced or ir)",
                other
            )),
        }
    }
}
