// Analyzer error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to callers of the analysis pipeline.
///
/// Recognition misses are never errors; they show up as absent fields in the
/// per-frame data. Only source, configuration and argument problems land here.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Video source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to probe video: {0}")]
    Probe(String),

    #[error("Failed to decode frame at {timestamp:.3}s: {message}")]
    Decode { timestamp: f64, message: String },

    #[error("Decoded frame has {actual} bytes, expected {expected} ({width}x{height} BGR24)")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
