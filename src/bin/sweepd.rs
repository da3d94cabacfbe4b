//! sweepd - live glint sweep
//!
//! Reads frames from the configured source, analyzes each one for bright
//! spots, prints results whenever they change and, if asked, keeps an
//! overlay PNG up to date. Runs until Ctrl-C, a frame budget, or the end of
//! the source.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use glint_sweep::{
    acquire, scan_rf_signals, select_scanner, CaptureLoop, PanelFormat, ResultsPanel, ScanHistory,
    ScanMode, ScanSession, SweepConfig,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(name = "sweepd", about = "Sweep a camera feed for hidden-camera glints")]
struct Args {
    /// Scan mode (basic|advanced|ir); overrides config
    #[arg(long, value_name = "MODE")]
    mode: Option<ScanMode>,

    /// Frame source: stub://<scene>, image file/directory, or /dev/videoN
    #[arg(long, value_name = "URI")]
    source: Option<String>,

    /// Target frame rate
    #[arg(long, value_name = "FPS", value_parser = clap::value_parser!(u32).range(1..))]
    fps: Option<u32>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,

    /// Write the overlay PNG here whenever the result changes
    #[arg(long, value_name = "PATH")]
    overlay: Option<PathBuf>,

    /// Result output format (text|json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    format: PanelFormat,

    /// Run one wireless pairing probe before sweeping
    #[arg(long)]
    rf: bool,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty, !stdout_is_tty);

    let mut cfg = {
        let _stage = ui.stage("Load configuration");
        SweepConfig::load()?
    };
    if let Some(mode) = args.mode {
        cfg.scan_mode = mode;
    }
    if let Some(uri) = args.source {
        cfg.source.uri = uri;
    }
    if let Some(fps) = args.fps {
        cfg.source.target_fps = fps;
    }
    if let Some(path) = args.overlay {
        cfg.overlay_path = Some(path);
    }
    cfg.validate()?;

    if args.rf {
        let _stage = ui.stage("Probe wireless");
        let mut scanner = select_scanner(&cfg.wireless);
        for signal in scan_rf_signals(scanner.as_mut()) {
            println!("{}", serde_json::to_string(&signal)?);
        }
    }

    let source = {
        let _stage = ui.stage("Open frame source");
        acquire(&cfg.source)
    };
    let Some(mut source) = source else {
        log::warn!("no frame source available; sweep not started");
        return Ok(());
    };
    log::info!(
        "sweeping {} at {} fps in {} mode",
        cfg.source.uri,
        cfg.source.target_fps,
        cfg.scan_mode
    );

    let mut session = ScanSession::new(cfg.scan_mode)
        .with_history(ScanHistory::new(cfg.history_capacity));
    session.add_listener(ResultsPanel::new(std::io::stdout(), args.format));

    let mut capture = CaptureLoop::new(cfg.source.target_fps);
    if let Some(max) = args.max_frames {
        capture = capture.with_max_frames(max);
    }
    if let Some(path) = cfg.overlay_path.clone() {
        capture = capture.with_overlay_path(path);
    }

    let stop = capture.stop_flag();
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })?;

    let summary = capture.run(&mut source, &mut session)?;
    log::info!(
        "sweep finished ({:?}); {} recent detections in history",
        summary.reason,
        session.history().len()
    );
    Ok(())
}
