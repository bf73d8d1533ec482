//! Video analysis pipeline.
//!
//! This module provides:
//! - Per-frame analysis (phase plus HUD readings)
//! - Game segmentation over the sampled timeline
//! - The `Analyzer` that drives sampling over a video
//! - JSON export and a plain-text report

pub mod export;
pub mod frame;
pub mod report;
pub mod result;
pub mod segment;

pub use frame::{analyze_frame, FrameData, FrameState, HudReadings};
pub use report::{render_text, TextReport};
pub use result::{AnalysisResult, GameSummary, Summary};
pub use segment::{attach_outcomes, segment_games, GameSegment};

use chrono::Local;
use std::path::Path;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::hud::HudReader;
use crate::ocr::OcrEngine;
use crate::video::FrameSource;

/// Default seconds between sampled frames.
pub const DEFAULT_INTERVAL_SEC: f64 = 10.0;

/// Where and how densely to sample a video.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingOptions {
    pub interval_sec: f64,
    pub start_sec: f64,
    /// Defaults to the probed duration
    pub end_sec: Option<f64>,
    /// Log and skip frames the source fails to decode instead of aborting
    pub skip_failed_frames: bool,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            interval_sec: DEFAULT_INTERVAL_SEC,
            start_sec: 0.0,
            end_sec: None,
            skip_failed_frames: false,
        }
    }
}

impl SamplingOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.interval_sec.is_finite() && self.interval_sec > 0.0) {
            return Err(AnalyzerError::InvalidArgument(format!(
                "interval must be a positive number of seconds, got {}",
                self.interval_sec
            )));
        }
        if !(self.start_sec.is_finite() && self.start_sec >= 0.0) {
            return Err(AnalyzerError::InvalidArgument(format!(
                "start must be >= 0, got {}",
                self.start_sec
            )));
        }
        if let Some(end) = self.end_sec {
            if !(end.is_finite() && end > self.start_sec) {
                return Err(AnalyzerError::InvalidArgument(format!(
                    "end ({}) must be a finite time after start ({})",
                    end, self.start_sec
                )));
            }
        }
        Ok(())
    }
}

/// Timestamps `start + i * interval` strictly below `stop`.
pub fn sample_timestamps(start: f64, stop: f64, interval: f64) -> Vec<f64> {
    let mut timestamps = Vec::new();
    if !(interval > 0.0) {
        return timestamps;
    }
    let mut i = 0u64;
    loop {
        let ts = start + i as f64 * interval;
        if ts >= stop {
            break;
        }
        timestamps.push(ts);
        i += 1;
    }
    timestamps
}

/// Drives the sampling loop: decode, analyze each frame, segment once.
pub struct Analyzer<S: FrameSource, E: OcrEngine> {
    source: S,
    engine: E,
    config: AnalyzerConfig,
}

impl<S: FrameSource, E: OcrEngine> Analyzer<S, E> {
    pub fn new(source: S, engine: E, config: AnalyzerConfig) -> Self {
        Self { source, engine, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Samples `path` every `interval_sec` seconds between `start_sec` and
    /// `end_sec` (or the end of the video). Any frame failure aborts the run.
    pub fn analyze(
        &self,
        path: &Path,
        interval_sec: f64,
        start_sec: f64,
        end_sec: Option<f64>,
    ) -> Result<AnalysisResult> {
        self.analyze_with(
            path,
            &SamplingOptions {
                interval_sec,
                start_sec,
                end_sec,
                skip_failed_frames: false,
            },
        )
    }

    pub fn analyze_with(&self, path: &Path, options: &SamplingOptions) -> Result<AnalysisResult> {
        options.validate()?;

        let info = self.source.probe(path)?;
        log::info!(
            "Analyzing {} ({}x{}, {:.1}s at {:.2} fps)",
            path.display(),
            info.width,
            info.height,
            info.duration,
            info.frame_rate
        );

        // Never seek past the last decodable frame.
        let stop = match options.end_sec {
            Some(end) if info.duration > 0.0 => end.min(info.duration),
            Some(end) => end,
            None => info.duration,
        };
        let timestamps = sample_timestamps(options.start_sec, stop, options.interval_sec);
        log::info!(
            "Sampling {} frames every {}s from {:.1}s to {:.1}s",
            timestamps.len(),
            options.interval_sec,
            options.start_sec,
            stop
        );

        let reader = HudReader::new(&self.engine, &self.config);
        let mut frames = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for ts in timestamps {
            let image = match self.source.extract_frame(path, ts) {
                Ok(image) => image,
                Err(e) if options.skip_failed_frames => {
                    log::warn!("Skipping frame at {:.1}s: {}", ts, e);
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            frames.push(analyze_frame(&reader, &image, ts));
        }

        let gap = self.config.segmentation.gap_for_interval(options.interval_sec);
        let mut games = segment_games(&frames, gap, self.config.segmentation.min_duration_sec);
        attach_outcomes(&mut games, &frames);

        if skipped > 0 {
            log::warn!("{} frame(s) could not be decoded and were skipped", skipped);
        }
        log::info!(
            "Analyzed {} frames, detected {} game(s) (gap threshold {:.0}s)",
            frames.len(),
            games.len(),
            gap
        );

        Ok(AnalysisResult {
            source: path.display().to_string(),
            analysis_date: Local::now(),
            duration_sec: info.duration,
            games,
            frame_data: frames,
        })
    }
}
