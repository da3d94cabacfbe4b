//! sweep_frame - analyze still images
//!
//! Runs one analysis per image and prints each result as a JSON line.
//! With a single input, `--overlay` writes the rendered overlay PNG.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use glint_sweep::{FrameAnalyzer, OverlayRenderer, RgbaFrame, ScanMode};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(name = "sweep_frame", about = "Analyze still images for hidden-camera glints")]
struct Args {
    /// Images to analyze (png or jpeg)
    #[arg(required = true, value_name = "IMAGE")]
    images: Vec<PathBuf>,

    /// Scan mode (basic|advanced|ir)
    #[arg(long, default_value = "basic", env = "SWEEP_MODE", value_name = "MODE")]
    mode: ScanMode,

    /// Write the overlay PNG for a single input image
    #[arg(long, value_name = "PATH")]
    overlay: Option<PathBuf>,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.overlay.is_some() && args.images.len() != 1 {
        return Err(anyhow!("--overlay needs exactly one input image"));
    }
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty, !stdout_is_tty);

    let mut analyzer = FrameAnalyzer::new();
    let renderer = OverlayRenderer::new();
    let mut progress = ui.frames(args.images.len() as u64);

    for path in &args.images {
        let frame = {
            let image = image::open(path)
                .with_context(|| format!("open image {}", path.display()))?
                .to_rgba8();
            RgbaFrame::from_image(image)
        };
        let result = analyzer.analyze_frame(&frame, args.mode);
        println!("{}", serde_json::to_string(&result)?);
        progress.advance(!result.is_clear());

        if let Some(out) = &args.overlay {
            let _stage = ui.stage("Render overlay");
            let mut layer = image::RgbaImage::new(frame.width, frame.height);
            renderer.render(&mut layer, &result.detections);
            layer
                .save(out)
                .with_context(|| format!("write overlay {}", out.display()))?;
        }
    }

    let flagged = progress.finish();
    log::info!(
        "{} of {} images flagged in {} mode",
        flagged,
        args.images.len(),
        args.mode
    );
    Ok(())
}
