use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::ingest::CaptureSettings;
use crate::scan::ScanMode;
use crate::wireless::{WirelessMode, WirelessSettings};

#[derive(Debug, Deserialize, Default)]
struct SweepConfigFile {
    scan_mode: Option<ScanMode>,
    history_capacity: Option<usize>,
    source: Option<SourceConfigFile>,
    overlay: Option<OverlayConfigFile>,
    wireless: Option<WirelessConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    uri: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    loop_playback: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    output_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct WirelessConfigFile {
    mode: Option<WirelessMode>,
    device_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub source: CaptureSettings,
    pub scan_mode: ScanMode,
    pub history_capacity: usize,
    pub overlay_path: Option<PathBuf>,
    pub wireless: WirelessSettings,
}

impl SweepConfig {
    /// Load from `SWEEP_CONFIG` (JSON, or TOML for `.toml` paths), then apply
    /// environment overrides and validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SWEEP_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SweepConfigFile) -> Self {
        let defaults = CaptureSettings::default();
        let source = file.source.unwrap_or_default();
        let wireless = file.wireless.unwrap_or_default();
        Self {
            source: CaptureSettings {
                uri: source.uri.unwrap_or(defaults.uri),
                target_fps: source.target_fps.unwrap_or(defaults.target_fps),
                width: source.width.unwrap_or(defaults.width),
                height: source.height.unwrap_or(defaults.height),
                loop_playback: source.loop_playback.unwrap_or(defaults.loop_playback),
            },
            scan_mode: file.scan_mode.unwrap_or_default(),
            history_capacity: file.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY),
            overlay_path: file.overlay.and_then(|overlay| overlay.output_path),
            wireless: WirelessSettings {
                mode: wireless.mode.unwrap_or_default(),
                device_name: wireless.device_name,
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(uri) = std::env::var("SWEEP_SOURCE") {
            if !uri.trim().is_empty() {
                self.source.uri = uri;
            }
        }
        if let Ok(fps) = std::env::var("SWEEP_FPS") {
            self.source.target_fps = fps
                .trim()
                .parse()
                .map_err(|_| anyhow!("SWEEP_FPS must be an integer frame rate"))?;
        }
        if let Ok(mode) = std::env::var("SWEEP_MODE") {
            if !mode.trim().is_empty() {
                self.scan_mode = mode.parse()?;
            }
        }
        if let Ok(mode) = std::env::var("SWEEP_WIRELESS") {
            if !mode.trim().is_empty() {
                self.wireless.mode = mode.parse()?;
            }
        }
        if let Ok(path) = std::env::var("SWEEP_OVERLAY_PATH") {
            if !path.trim().is_empty() {
                self.overlay_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(capacity) = std::env::var("SWEEP_HISTORY") {
            self.history_capacity = capacity
                .trim()
                .parse()
                .map_err(|_| anyhow!("SWEEP_HISTORY must be a positive integer"))?;
        }
        Ok(())
    }

    /// Re-run after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        if self.source.uri.trim().is_empty() {
            return Err(anyhow!("source uri must not be empty"));
        }
        if self.source.target_fps == 0 {
            return Err(anyhow!("source target_fps must be greater than zero"));
        }
        if self.source.width == 0 || self.source.height == 0 {
            return Err(anyhow!(
                "source dimensions must be non-zero (got {}x{})",
                self.source.width,
                self.source.height
            ));
        }
        if self.history_capacity == 0 {
            return Err(anyhow!("history_capacity must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::from_file(SweepConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<SweepConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
