//! HUD field readers.
//!
//! Every field is read with the same protocol: an ordered list of attempts,
//! each a region plus a recognition setup, tried until one parses. The
//! focused region goes first (precise, little context); the broad scoreboard
//! region is the fallback (noisier, but survives misaligned crops).

pub mod clock;
pub mod outcome;
pub mod score;

pub use clock::{parse_game_time, GameClock};
pub use outcome::{match_outcome_text, MatchOutcome};
pub use score::{parse_player_kda, parse_team_kills, PlayerKda, TeamKills};

use image::RgbImage;

use crate::config::AnalyzerConfig;
use crate::ocr::{recognize_crop, Binarize, OcrEngine, PageSegMode, Recognition};
use crate::region::Region;

/// One extraction attempt: where to look and how to read it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attempt {
    pub region: Region,
    pub recognition: Recognition,
}

impl Attempt {
    /// Otsu-binarized attempt, the setup used for all HUD text.
    pub fn otsu(
        region: Region,
        scale: u32,
        mode: PageSegMode,
        whitelist: Option<&'static str>,
    ) -> Self {
        Self {
            region,
            recognition: Recognition {
                binarize: Binarize::Otsu,
                scale,
                mode,
                whitelist,
            },
        }
    }
}

/// Reads HUD fields from frames with a borrowed OCR engine and config.
pub struct HudReader<'a, E: OcrEngine + ?Sized> {
    engine: &'a E,
    config: &'a AnalyzerConfig,
}

impl<'a, E: OcrEngine + ?Sized> HudReader<'a, E> {
    pub fn new(engine: &'a E, config: &'a AnalyzerConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.config
    }

    /// OCR text for a single attempt.
    pub fn read(&self, frame: &RgbImage, attempt: &Attempt) -> String {
        let crop = attempt.region.crop(frame);
        recognize_crop(self.engine, &crop, &attempt.recognition)
    }

    /// Tries `attempts` in order and returns the first successful parse.
    pub fn first_match<T>(
        &self,
        frame: &RgbImage,
        attempts: &[Attempt],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        for (idx, attempt) in attempts.iter().enumerate() {
            let text = self.read(frame, attempt);
            if let Some(value) = parse(&text) {
                return Some(value);
            }
            log::trace!("attempt {} miss: {:?}", idx + 1, text);
        }
        None
    }

    fn scale(&self) -> u32 {
        self.config.ocr.hud_scale
    }
}
