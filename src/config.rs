//! Analyzer configuration.
//!
//! Region geometry, classifier thresholds, OCR settings and segmentation
//! parameters. Defaults are calibrated against the stock Wild Rift HUD
//! (854x394 reference capture, scoreboard in the top-right). A JSON file can
//! override any subset; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyzerError, Result};
use crate::region::Region;

/// Config file name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "wr_analyzer.json";

/// Largest accepted HUD upscale factor.
pub const MAX_HUD_SCALE: u32 = 10;

/// HUD regions used by the field parsers and the phase classifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HudLayout {
    /// Broad scoreboard area: kill score, clock and KDA together
    pub scoreboard: Region,
    /// Game clock ("12:34"), second row below the kill score
    pub timer: Region,
    /// Team kill score ("# VS #"), first row
    pub kills: Region,
    /// Player KDA ("K/D/A"), right of the kill score
    pub player_kda: Region,
    /// Large centred VICTORY/DEFEAT banner shown right after the game ends
    pub result_banner: Region,
    /// Header text on the post-game stats screen
    pub result_header: Region,
}

impl Default for HudLayout {
    fn default() -> Self {
        Self {
            scoreboard: Region::new(0.70, 0.0, 0.17, 0.12),
            timer: Region::new(0.71, 0.04, 0.08, 0.06),
            kills: Region::new(0.70, 0.0, 0.13, 0.06),
            player_kda: Region::new(0.81, 0.0, 0.07, 0.06),
            result_banner: Region::new(0.25, 0.05, 0.50, 0.35),
            result_header: Region::new(0.30, 0.0, 0.40, 0.12),
        }
    }
}

impl HudLayout {
    fn named_regions(&self) -> [(&'static str, &Region); 6] {
        [
            ("scoreboard", &self.scoreboard),
            ("timer", &self.timer),
            ("kills", &self.kills),
            ("player_kda", &self.player_kda),
            ("result_banner", &self.result_banner),
            ("result_header", &self.result_header),
        ]
    }

    /// Returns a description of every region that is degenerate or runs off
    /// the frame. Such regions still work (they crop to less or nothing).
    pub fn geometry_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, region) in self.named_regions() {
            if region.is_degenerate() {
                warnings.push(format!("region '{}' has zero area: {:?}", name, region));
            } else if !region.is_within_frame() {
                warnings.push(format!("region '{}' extends past the frame: {:?}", name, region));
            }
        }
        warnings
    }
}

/// Fixed classifier thresholds (grayscale 0-255).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Frame mean below this counts as dark (loading candidate)
    pub loading_brightness_max: f64,
    /// Scoreboard mean below this counts as an empty HUD
    pub scoreboard_empty_max: f64,
    /// Frame mean above this counts as a post-game stat screen
    pub postgame_brightness_min: f64,
    /// Brightest kills-region pixel must reach this for HUD presence
    pub hud_bright_pixel_min: u8,
    /// Pixels above this count towards the bright fraction
    pub hud_bright_floor: u8,
    /// Minimum fraction of bright pixels in the kills region
    pub hud_bright_fraction_min: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            loading_brightness_max: 40.0,
            scoreboard_empty_max: 30.0,
            postgame_brightness_min: 120.0,
            hud_bright_pixel_min: 100,
            hud_bright_floor: 80,
            hud_bright_fraction_min: 0.02,
        }
    }
}

/// OCR engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Explicit tesseract executable; resolved from env/sidecar/PATH when unset
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory
    pub tessdata_dir: Option<PathBuf>,
    /// Tesseract language
    pub language: String,
    /// Upscale factor applied to HUD crops before thresholding
    pub hud_scale: u32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            tessdata_dir: None,
            language: "eng".to_string(),
            hud_scale: 5,
        }
    }
}

/// Segment builder parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Gap threshold never drops below this (seconds)
    pub gap_floor_sec: f64,
    /// Gap threshold grows to this multiple of the sampling interval
    pub gap_interval_multiplier: f64,
    /// Segments shorter than this are discarded (seconds)
    pub min_duration_sec: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            gap_floor_sec: 30.0,
            gap_interval_multiplier: 5.0,
            min_duration_sec: 60.0,
        }
    }
}

impl SegmentationConfig {
    /// Effective gap threshold for a given sampling interval.
    ///
    /// OCR misses many samples at low resolution, so the tolerated gap scales
    /// with the interval instead of requiring a read on every sample.
    pub fn gap_for_interval(&self, interval_sec: f64) -> f64 {
        self.gap_floor_sec
            .max(interval_sec * self.gap_interval_multiplier)
    }
}

/// Complete analyzer configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub layout: HudLayout,
    pub thresholds: PhaseThresholds,
    pub ocr: OcrSettings,
    pub segmentation: SegmentationConfig,
}

impl AnalyzerConfig {
    /// Parses a config from JSON text.
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: AnalyzerConfig = serde_json::from_str(contents)
            .map_err(|e| AnalyzerError::Config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        for warning in config.layout.geometry_warnings() {
            log::warn!("{}", warning);
        }
        Ok(config)
    }

    /// Loads a config file. Any failure is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&contents)?;
        log::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Loads the first config found in the default locations, or defaults.
    ///
    /// Unlike `load_from`, unreadable or malformed files are logged and skipped.
    pub fn discover() -> Self {
        for candidate in crate::paths::config_candidates() {
            if !candidate.exists() {
                continue;
            }
            log::debug!("Looking for config at: {}", candidate.display());
            match Self::load_from(&candidate) {
                Ok(config) => return config,
                Err(e) => log::warn!("{}. Using defaults.", e),
            }
        }
        log::debug!("No config file found. Using default config.");
        AnalyzerConfig::default()
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_HUD_SCALE).contains(&self.ocr.hud_scale) {
            return Err(AnalyzerError::Config(format!(
                "ocr.hud_scale must be within 1-{}, got {}",
                MAX_HUD_SCALE, self.ocr.hud_scale
            )));
        }
        let seg = &self.segmentation;
        if !(seg.gap_floor_sec >= 0.0
            && seg.min_duration_sec >= 0.0
            && seg.gap_interval_multiplier >= 0.0)
        {
            return Err(AnalyzerError::Config(
                "segmentation parameters must be non-negative".to_string(),
            ));
        }
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.hud_bright_fraction_min) {
            return Err(AnalyzerError::Config(
                "thresholds.hud_bright_fraction_min must be within 0.0-1.0".to_string(),
            ));
        }
        Ok(())
    }
}
