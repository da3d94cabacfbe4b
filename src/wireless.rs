//! Wireless pairing stub.
//!
//! This is a placeholder, not an RF sensor. A successful pairing yields one
//! record with fixed values (2.4 GHz, -50 dBm); nothing is measured. Absence
//! of the capability, a denied prompt, or any error all yield no signals.
//!
//! The capability is chosen once, when the session starts, through
//! `select_scanner`. Call sites never probe the host themselves.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::detect::Location;

/// Typical Bluetooth band.
pub const PLACEHOLDER_FREQUENCY_GHZ: f32 = 2.4;
/// Fixed strength estimate reported for any paired device.
pub const PLACEHOLDER_STRENGTH_DBM: f32 = -50.0;

/// Outcome of one pairing request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    None,
    Detected {
        frequency_ghz: f32,
        strength_dbm: f32,
        device_name: Option<String>,
    },
}

impl Signal {
    pub fn placeholder(device_name: Option<String>) -> Self {
        Signal::Detected {
            frequency_ghz: PLACEHOLDER_FREQUENCY_GHZ,
            strength_dbm: PLACEHOLDER_STRENGTH_DBM,
            device_name,
        }
    }
}

/// Signal record handed to listeners. Location is always the zero rectangle.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RfSignal {
    pub location: Location,
    pub strength: f32,
    pub frequency: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
}

/// Host wireless pairing capability.
pub trait WirelessScanner: Send {
    fn name(&self) -> &'static str;

    /// Whether the host offers a pairing prompt at all.
    fn available(&self) -> bool;

    /// Ask the host to pair with any nearby device.
    fn request_pairing(&mut self) -> Result<Signal>;
}

/// Host without wireless capability.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWireless;

impl WirelessScanner for NoWireless {
    fn name(&self) -> &'static str {
        "none"
    }

    fn available(&self) -> bool {
        false
    }

    fn request_pairing(&mut self) -> Result<Signal> {
        Ok(Signal::None)
    }
}

/// How a simulated pairing prompt answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairingOutcome {
    Accept { device_name: Option<String> },
    Deny,
    Fail(String),
}

/// Pairing prompt with a preset answer. Stands in for a host dialog.
#[derive(Clone, Debug)]
pub struct SimulatedPairing {
    outcome: PairingOutcome,
    requests: u32,
}

impl SimulatedPairing {
    pub fn new(outcome: PairingOutcome) -> Self {
        Self {
            outcome,
            requests: 0,
        }
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl WirelessScanner for SimulatedPairing {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn available(&self) -> bool {
        true
    }

    fn request_pairing(&mut self) -> Result<Signal> {
        self.requests += 1;
        match &self.outcome {
            PairingOutcome::Accept { device_name } => Ok(Signal::placeholder(device_name.clone())),
            PairingOutcome::Deny => Ok(Signal::None),
            PairingOutcome::Fail(reason) => Err(anyhow!("pairing request failed: {}", reason)),
        }
    }
}

/// Configured wireless capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WirelessMode {
    #[default]
    Absent,
    Accept,
    Deny,
}

impl fmt::Display for WirelessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WirelessMode::Absent => "absent",
            WirelessMode::Accept => "accept",
            WirelessMode::Deny => "deny",
        })
    }
}

impl FromStr for WirelessMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absent" | "none" | "off" => Ok(WirelessMode::Absent),
            "accept" => Ok(WirelessMode::Accept),
            "deny" => Ok(WirelessMode::Deny),
            other => Err(anyhow!(
                "unknown wireless mode '{}' (expected absent, accept or deny)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WirelessSettings {
    pub mode: WirelessMode,
    pub device_name: Option<String>,
}

/// Pick the wireless capability for this session.
pub fn select_scanner(settings: &WirelessSettings) -> Box<dyn WirelessScanner> {
    let scanner: Box<dyn WirelessScanner> = match settings.mode {
        WirelessMode::Absent => Box::new(NoWireless),
        WirelessMode::Accept => Box::new(SimulatedPairing::new(PairingOutcome::Accept {
            device_name: settings.device_name.clone(),
        })),
        WirelessMode::Deny => Box::new(SimulatedPairing::new(PairingOutcome::Deny)),
    };
    log::info!(
        "wireless capability: {} (available={})",
        scanner.name(),
        scanner.available()
    );
    scanner
}

/// Request one pairing and report the placeholder signal, if any. Never fails.
pub fn scan_rf_signals(scanner: &mut dyn WirelessScanner) -> Vec<RfSignal> {
    if !scanner.available() {
        log::warn!("rf scan skipped: wireless pairing not supported on this host");
        return Vec::new();
    }
    match scanner.request_pairing() {
        Ok(Signal::Detected {
            frequency_ghz,
            strength_dbm,
            device_name,
        }) => vec![RfSignal {
            location: Location::ZERO,
            strength: strength_dbm,
            frequency: frequency_ghz,
            device_name,
        }],
        Ok(Signal::None) => {
            log::warn!("rf scan: pairing permission denied");
            Vec::new()
        }
        Err(e) => {
            log::error!("rf scanning error: {:#}", e);
            Vec::new()
        }
    }
}
