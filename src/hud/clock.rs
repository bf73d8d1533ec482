//! Game clock detection and parsing.

use image::RgbImage;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

use super::{Attempt, HudReader};
use crate::ocr::{OcrEngine, PageSegMode};

/// "MM:SS" or "M:SS"; the colon may OCR as a period or semicolon.
static TIMER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2})[:.;]([0-9]{2})").expect("valid timer pattern"));

/// No single match runs this long; larger minute values are misreads.
const MAX_MINUTES: u32 = 40;

const TIMER_WHITELIST: &str = "0123456789:";

/// In-match clock, rendered as "M:SS".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameClock {
    seconds: u32,
}

impl GameClock {
    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl Serialize for GameClock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses the first clock-like token in `text` into total seconds.
///
/// Returns `None` when there is no token, or when the first token is not a
/// plausible match time (seconds >= 60 or minutes > 40).
pub fn parse_game_time(text: &str) -> Option<u32> {
    let caps = TIMER_RE.captures(text)?;
    let minutes: u32 = caps[1].parse().ok()?;
    let seconds: u32 = caps[2].parse().ok()?;
    if seconds >= 60 || minutes > MAX_MINUTES {
        return None;
    }
    Some(minutes * 60 + seconds)
}

impl<E: OcrEngine + ?Sized> HudReader<'_, E> {
    /// Timer region first, then the scoreboard with more context.
    pub fn clock_attempts(&self) -> [Attempt; 2] {
        let layout = &self.config().layout;
        [
            Attempt::otsu(
                layout.timer,
                self.scale(),
                PageSegMode::SingleLine,
                Some(TIMER_WHITELIST),
            ),
            Attempt::otsu(layout.scoreboard, self.scale(), PageSegMode::Block, None),
        ]
    }

    /// Extracts the game clock from a frame.
    pub fn game_time(&self, frame: &RgbImage) -> Option<GameClock> {
        self.first_match(frame, &self.clock_attempts(), |text| {
            parse_game_time(text).map(GameClock::from_seconds)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::hud::testing::{FixedText, Script};
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_parse_game_time() {
        assert_eq!(parse_game_time("12:34"), Some(754));
        assert_eq!(parse_game_time("4:15"), Some(255));
        assert_eq!(parse_game_time("0:00"), Some(0));
        assert_eq!(parse_game_time("40:59"), Some(2459));
    }

    #[test]
    fn test_parse_game_time_separator_noise() {
        assert_eq!(parse_game_time("12.34"), Some(754));
        assert_eq!(parse_game_time("12;34"), Some(754));
    }

    #[test]
    fn test_parse_game_time_rejects_implausible() {
        assert_eq!(parse_game_time("12:99"), None);
        assert_eq!(parse_game_time("50:00"), None);
        assert_eq!(parse_game_time("41:00"), None);
    }

    #[test]
    fn test_parse_game_time_no_match() {
        assert_eq!(parse_game_time(""), None);
        assert_eq!(parse_game_time("VS"), None);
        assert_eq!(parse_game_time("1:2"), None);
    }

    #[test]
    fn test_parse_game_time_surrounding_noise() {
        assert_eq!(parse_game_time("abc 04:15 xyz"), Some(255));
        assert_eq!(parse_game_time("25 VS 29\n12:34 3/2/18"), Some(754));
    }

    #[test]
    fn test_clock_display() {
        assert_eq!(GameClock::from_seconds(754).to_string(), "12:34");
        assert_eq!(GameClock::from_seconds(255).to_string(), "4:15");
        assert_eq!(GameClock::from_seconds(5).to_string(), "0:05");
        assert_eq!(serde_json::to_string(&GameClock::from_seconds(65)).unwrap(), "\"1:05\"");
    }

    #[test]
    fn test_game_time_focused_region() {
        let engine = FixedText::new("04:15");
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([20, 20, 20]));

        let clock = HudReader::new(&engine, &config).game_time(&frame);
        assert_eq!(clock, Some(GameClock::from_seconds(255)));
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_game_time_scoreboard_fallback() {
        let engine = Script::new(&["4 15", "3 VS 1\n7:08"]);
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([20, 20, 20]));

        let clock = HudReader::new(&engine, &config).game_time(&frame);
        assert_eq!(clock.map(|c| c.to_string()).as_deref(), Some("7:08"));

        let seen = engine.seen.borrow();
        assert_eq!(seen[0].2, PageSegMode::SingleLine);
        assert_eq!(seen[1].2, PageSegMode::Block);
    }

    #[test]
    fn test_game_time_not_detected() {
        let engine = FixedText::new("");
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([20, 20, 20]));

        assert_eq!(HudReader::new(&engine, &config).game_time(&frame), None);
        assert_eq!(engine.calls(), 2);
    }
}
