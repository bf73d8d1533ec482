//! Video access: metadata probing and single-frame extraction.

pub mod ffmpeg;

pub use ffmpeg::FfmpegSource;

use image::RgbImage;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;

/// Basic metadata about a video file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// Seconds
    pub duration: f64,
}

/// Decodes frames from a video source.
///
/// Implementations must report a missing source as
/// `AnalyzerError::SourceNotFound`, distinct from decode failures.
pub trait FrameSource {
    fn probe(&self, source: &Path) -> Result<VideoInfo>;

    /// Decodes the frame shown at `timestamp` seconds.
    fn extract_frame(&self, source: &Path, timestamp: f64) -> Result<RgbImage>;
}

impl<S: FrameSource + ?Sized> FrameSource for &S {
    fn probe(&self, source: &Path) -> Result<VideoInfo> {
        (**self).probe(source)
    }

    fn extract_frame(&self, source: &Path, timestamp: f64) -> Result<RgbImage> {
        (**self).extract_frame(source, timestamp)
    }
}
