//! Wild Rift gameplay-video analyzer.
//!
//! Samples frames from a recorded match video, classifies each frame's game
//! phase, reads the HUD (game clock, team kill score, player KDA) by OCR and
//! groups in-game frames into individual games.

pub mod analysis;
pub mod config;
pub mod error;
pub mod hud;
pub mod ocr;
pub mod paths;
pub mod phase;
pub mod region;
pub mod video;

pub use analysis::{AnalysisResult, Analyzer, FrameData, GameSegment, SamplingOptions, Summary};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use phase::Phase;
pub use region::Region;
