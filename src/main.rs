//! wr-analyzer command line
//!
//! Analyzes a Wild Rift gameplay video and prints a text report or JSON.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use wr_analyzer::analysis::{export, render_text, Analyzer, SamplingOptions};
use wr_analyzer::ocr::{ensure_tesseract, TesseractEngine};
use wr_analyzer::video::FfmpegSource;
use wr_analyzer::AnalyzerConfig;

#[derive(Parser)]
#[command(name = "wr-analyzer")]
#[command(about = "Analyze a Wild Rift gameplay video", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the video file
    video: PathBuf,

    /// Seconds between sampled frames
    #[arg(long, default_value_t = 15.0)]
    interval: f64,

    /// Start timestamp in seconds
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// End timestamp in seconds (defaults to the video duration)
    #[arg(long)]
    end: Option<f64>,

    /// Print the JSON summary instead of the text report
    #[arg(long)]
    json: bool,

    /// Write the full per-frame result as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to wr_analyzer.json next to the executable,
    /// then the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip frames that fail to decode instead of aborting
    #[arg(long)]
    skip_errors: bool,
}

fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {:<5} {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalyzerConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::discover(),
    };

    let engine = TesseractEngine::from_settings(&config.ocr);
    if let Err(e) = ensure_tesseract(engine.executable()) {
        log::warn!("{}. HUD fields will not be read.", e);
    }

    let options = SamplingOptions {
        interval_sec: cli.interval,
        start_sec: cli.start,
        end_sec: cli.end,
        skip_failed_frames: cli.skip_errors,
    };

    log::info!(
        "Analyzing {} (sampling every {}s) ...",
        cli.video.display(),
        cli.interval
    );
    let analyzer = Analyzer::new(FfmpegSource::default(), engine, config);
    let result = analyzer
        .analyze_with(&cli.video, &options)
        .with_context(|| format!("Analysis of {} failed", cli.video.display()))?;

    if let Some(path) = &cli.output {
        export::export_to_json(&result, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        let json =
            export::to_json_string(&result.summary()).context("Failed to serialize summary")?;
        writeln!(stdout, "{}", json)?;
    } else {
        write!(stdout, "{}", render_text(&result))?;
    }

    Ok(())
}
