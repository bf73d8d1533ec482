//! Win/loss detection from post-game screens.
//!
//! VICTORY/DEFEAT shows up in two places: the large animated banner right
//! after the nexus falls, and the header of the post-game stats screen.

use image::RgbImage;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use super::{Attempt, HudReader};
use crate::ocr::{OcrEngine, PageSegMode};

// "VICTORY" often reads as "Victory", "VICTARY", "VICTQRY".
// "DEFEAT" sometimes splits into "DEF EAT".
static VICTORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vict").expect("valid victory pattern"));
static DEFEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)def\s*eat").expect("valid defeat pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Victory,
    Defeat,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Victory => write!(f, "victory"),
            MatchOutcome::Defeat => write!(f, "defeat"),
        }
    }
}

/// Victory is checked before defeat.
pub fn match_outcome_text(text: &str) -> Option<MatchOutcome> {
    if VICTORY_RE.is_match(text) {
        return Some(MatchOutcome::Victory);
    }
    if DEFEAT_RE.is_match(text) {
        return Some(MatchOutcome::Defeat);
    }
    None
}

impl<E: OcrEngine + ?Sized> HudReader<'_, E> {
    pub fn outcome_attempts(&self) -> [Attempt; 2] {
        let layout = &self.config().layout;
        [
            Attempt::otsu(layout.result_banner, self.scale(), PageSegMode::Block, None),
            Attempt::otsu(layout.result_header, self.scale(), PageSegMode::Block, None),
        ]
    }

    /// Banner region first, then the stats-screen header.
    pub fn match_outcome(&self, frame: &RgbImage) -> Option<MatchOutcome> {
        self.first_match(frame, &self.outcome_attempts(), match_outcome_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::hud::testing::Script;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_match_outcome_text() {
        assert_eq!(match_outcome_text("VICTORY"), Some(MatchOutcome::Victory));
        assert_eq!(match_outcome_text("Victory"), Some(MatchOutcome::Victory));
        assert_eq!(match_outcome_text("~ VICTQRY ~"), Some(MatchOutcome::Victory));
        assert_eq!(match_outcome_text("DEFEAT"), Some(MatchOutcome::Defeat));
        assert_eq!(match_outcome_text("DEF EAT"), Some(MatchOutcome::Defeat));
        assert_eq!(match_outcome_text("defeat"), Some(MatchOutcome::Defeat));
    }

    #[test]
    fn test_match_outcome_text_no_match() {
        assert_eq!(match_outcome_text(""), None);
        assert_eq!(match_outcome_text("OEFEAT"), None);
        assert_eq!(match_outcome_text("25 VS 29"), None);
    }

    #[test]
    fn test_match_outcome_header_fallback() {
        let engine = Script::new(&["", "DEFEAT  12 VS 20"]);
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([60, 60, 60]));

        assert_eq!(
            HudReader::new(&engine, &config).match_outcome(&frame),
            Some(MatchOutcome::Defeat)
        );
        assert_eq!(engine.seen.borrow().len(), 2);
    }

    #[test]
    fn test_match_outcome_banner_wins() {
        let engine = Script::new(&["VICTORY", "DEFEAT"]);
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([60, 60, 60]));

        assert_eq!(
            HudReader::new(&engine, &config).match_outcome(&frame),
            Some(MatchOutcome::Victory)
        );
        assert_eq!(engine.seen.borrow().len(), 1);
    }
}
