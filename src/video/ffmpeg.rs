// FFprobe/FFmpeg wrapper for metadata and raw frame extraction

use image::{ImageBuffer, RgbImage};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{FrameSource, VideoInfo};
use crate::error::{AnalyzerError, Result};

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    streams: Option<Vec<FFprobeStream>>,
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
}

/// Frame source backed by the ffprobe and ffmpeg executables.
///
/// Frame dimensions are remembered per source after the first probe, so
/// sampling a video spawns ffprobe once rather than once per frame.
#[derive(Clone, Debug)]
pub struct FfmpegSource {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    dimensions: RefCell<HashMap<PathBuf, (u32, u32)>>,
}

impl Default for FfmpegSource {
    fn default() -> Self {
        Self::new(crate::paths::ffmpeg_path(), crate::paths::ffprobe_path())
    }
}

impl FfmpegSource {
    pub fn new(ffmpeg: PathBuf, ffprobe: PathBuf) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            dimensions: RefCell::new(HashMap::new()),
        }
    }

    fn run_probe(&self, source: &Path) -> Result<VideoInfo> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(source)
            .output()
            .map_err(|e| AnalyzerError::Probe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalyzerError::Probe(format!(
                "ffprobe failed on {}: {}",
                source.display(),
                stderr.trim()
            )));
        }

        let info = parse_probe_output(&output.stdout)?;
        self.dimensions
            .borrow_mut()
            .insert(source.to_path_buf(), (info.width, info.height));
        Ok(info)
    }

    /// Decoded frame size for `source`, probing only on the first request.
    /// A probe failure here is reported as a decode failure at `timestamp`.
    fn frame_dimensions(&self, source: &Path, timestamp: f64) -> Result<(u32, u32)> {
        if let Some(&dims) = self.dimensions.borrow().get(source) {
            return Ok(dims);
        }
        match self.run_probe(source) {
            Ok(info) => Ok((info.width, info.height)),
            Err(AnalyzerError::Probe(message)) => Err(AnalyzerError::Decode { timestamp, message }),
            Err(e) => Err(e),
        }
    }
}

fn ensure_exists(source: &Path) -> Result<()> {
    if !source.exists() {
        return Err(AnalyzerError::SourceNotFound(source.to_path_buf()));
    }
    Ok(())
}

impl FrameSource for FfmpegSource {
    fn probe(&self, source: &Path) -> Result<VideoInfo> {
        ensure_exists(source)?;
        self.run_probe(source)
    }

    fn extract_frame(&self, source: &Path, timestamp: f64) -> Result<RgbImage> {
        ensure_exists(source)?;
        let (width, height) = self.frame_dimensions(source, timestamp)?;

        let output = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-ss"])
            .arg(format!("{:.3}", timestamp))
            .arg("-i")
            .arg(source)
            .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "bgr24", "-"])
            .output()
            .map_err(|e| AnalyzerError::Decode {
                timestamp,
                message: format!("Failed to run ffmpeg: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalyzerError::Decode {
                timestamp,
                message: format!("ffmpeg failed: {}", stderr.trim()),
            });
        }
        if output.stdout.is_empty() {
            return Err(AnalyzerError::Decode {
                timestamp,
                message: "no frame decoded".to_string(),
            });
        }

        bgr_to_rgb_image(width, height, &output.stdout)
    }
}

/// Builds an RGB image from one raw BGR24 frame, checking the byte count.
pub fn bgr_to_rgb_image(width: u32, height: u32, bytes: &[u8]) -> Result<RgbImage> {
    let expected = width as usize * height as usize * 3;
    if bytes.len() != expected {
        return Err(AnalyzerError::FrameSize {
            width,
            height,
            expected,
            actual: bytes.len(),
        });
    }

    let rgb: Vec<u8> = bytes
        .chunks_exact(3)
        .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
        .collect();

    ImageBuffer::from_raw(width, height, rgb).ok_or(AnalyzerError::FrameSize {
        width,
        height,
        expected,
        actual: bytes.len(),
    })
}

fn parse_probe_output(stdout: &[u8]) -> Result<VideoInfo> {
    let probe: FFprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| AnalyzerError::Probe(format!("Failed to parse ffprobe output: {}", e)))?;

    let stream = probe
        .streams
        .unwrap_or_default()
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| AnalyzerError::Probe("no video stream found".to_string()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(AnalyzerError::Probe("video stream has no dimensions".to_string())),
    };

    let frame_rate = parse_frame_rate(stream.r_frame_rate.as_deref())
        .or_else(|| parse_frame_rate(stream.avg_frame_rate.as_deref()))
        .unwrap_or(0.0);

    let duration = parse_seconds(stream.duration.as_deref())
        .or_else(|| parse_seconds(probe.format.as_ref().and_then(|f| f.duration.as_deref())))
        .unwrap_or(0.0);

    Ok(VideoInfo {
        width,
        height,
        frame_rate,
        duration,
    })
}

/// Parse frame rate string like "30000/1001" to f64
fn parse_frame_rate(rate_str: Option<&str>) -> Option<f64> {
    let rate_str = rate_str?;
    if let Some((num, den)) = rate_str.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate_str.parse().ok()
}

fn parse_seconds(duration_str: Option<&str>) -> Option<f64> {
    let seconds: f64 = duration_str?.parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}
