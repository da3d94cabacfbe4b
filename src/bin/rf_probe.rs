//! rf_probe - wireless pairing stub
//!
//! Asks the configured wireless capability to pair once and prints the
//! resulting placeholder signals as JSON. Prints `[]` when nothing pairs.

use anyhow::Result;
use clap::Parser;

use glint_sweep::{scan_rf_signals, select_scanner, SweepConfig, WirelessMode};

#[derive(Parser, Debug)]
#[command(name = "rf_probe", about = "Report placeholder wireless signals")]
struct Args {
    /// Wireless capability (absent|accept|deny); overrides config
    #[arg(long, value_name = "MODE")]
    wireless: Option<WirelessMode>,

    /// Device name reported by an accepted pairing
    #[arg(long, value_name = "NAME")]
    device_name: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = SweepConfig::load()?;
    if let Some(mode) = args.wireless {
        cfg.wireless.mode = mode;
    }
    if args.device_name.is_some() {
        cfg.wireless.device_name = args.device_name;
    }

    let mut scanner = select_scanner(&cfg.wireless);
    let signals = scan_rf_signals(scanner.as_mut());
    let json = if args.pretty {
        serde_json::to_string_pretty(&signals)?
    } else {
        serde_json::to_string(&signals)?
    };
    println!("{json}");
    Ok(())
}
