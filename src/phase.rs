//! Game phase classification.
//!
//! Each frame is classified on its own by an ordered cascade; the first rule
//! that fires wins:
//!
//! * **in_game**: the game clock is readable.
//! * **loading**: the whole frame is dark *and* the scoreboard area is empty.
//! * **post_game**: the frame is bright (stat screens), *or* a VICTORY/DEFEAT
//!   banner is readable.
//! * **in_game**: the kills HUD shows the bright-text signature of the
//!   overlay even though the clock did not OCR.
//! * **unknown**: nothing matched.

use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::fmt;

use crate::config::PhaseThresholds;
use crate::hud::{GameClock, HudReader, MatchOutcome};
use crate::ocr::{to_grayscale, OcrEngine};
use crate::region::Region;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    InGame,
    PostGame,
    Unknown,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Loading, Phase::InGame, Phase::PostGame, Phase::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::InGame => "in_game",
            Phase::PostGame => "post_game",
            Phase::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which cascade rule produced the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    ClockRead,
    DarkFrame,
    BrightFrame,
    OutcomeBanner,
    HudOverlay,
    NoMatch,
}

/// Phase plus whatever evidence the cascade already extracted on the way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub phase: Phase,
    pub rule: Rule,
    /// Set when the clock rule fired
    pub clock: Option<GameClock>,
    /// Set when the outcome-banner rule fired
    pub outcome: Option<MatchOutcome>,
}

impl Classification {
    fn of(phase: Phase, rule: Rule) -> Self {
        Self {
            phase,
            rule,
            clock: None,
            outcome: None,
        }
    }
}

/// Mean gray value, 0.0 (black) to 255.0 (white). Empty images are 0.0.
pub fn mean_brightness(gray: &GrayImage) -> f64 {
    if gray.width() == 0 || gray.height() == 0 {
        return 0.0;
    }
    let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    total as f64 / (gray.width() as u64 * gray.height() as u64) as f64
}

/// Mean gray value of `region` within `frame`.
pub fn region_brightness(frame: &RgbImage, region: &Region) -> f64 {
    mean_brightness(&to_grayscale(&region.crop(frame)))
}

/// True when the kills HUD region looks like the in-game overlay: its
/// brightest pixel clears the intensity floor and enough pixels are lit.
pub fn has_hud_overlay(frame: &RgbImage, kills: &Region, thresholds: &PhaseThresholds) -> bool {
    let gray = to_grayscale(&kills.crop(frame));
    let pixel_count = gray.width() as u64 * gray.height() as u64;
    if pixel_count == 0 {
        return false;
    }

    let max = gray.pixels().map(|p| p[0]).max().unwrap_or(0);
    if max < thresholds.hud_bright_pixel_min {
        return false;
    }

    let bright = gray
        .pixels()
        .filter(|p| p[0] > thresholds.hud_bright_floor)
        .count() as u64;
    bright as f64 / pixel_count as f64 >= thresholds.hud_bright_fraction_min
}

/// Classifies one frame. Pure: the same frame always yields the same result.
pub fn classify_frame<E: OcrEngine + ?Sized>(
    reader: &HudReader<'_, E>,
    frame: &RgbImage,
) -> Classification {
    let config = reader.config();
    let thresholds = &config.thresholds;

    // The clock only renders during active play.
    if let Some(clock) = reader.game_time(frame) {
        return Classification {
            clock: Some(clock),
            ..Classification::of(Phase::InGame, Rule::ClockRead)
        };
    }

    let frame_mean = mean_brightness(&to_grayscale(frame));
    let scoreboard_mean = region_brightness(frame, &config.layout.scoreboard);
    log::trace!(
        "brightness: frame {:.1}, scoreboard {:.1}",
        frame_mean,
        scoreboard_mean
    );

    if frame_mean < thresholds.loading_brightness_max
        && scoreboard_mean < thresholds.scoreboard_empty_max
    {
        return Classification::of(Phase::Loading, Rule::DarkFrame);
    }

    // End-of-game stat screens use light backgrounds.
    if frame_mean > thresholds.postgame_brightness_min {
        return Classification::of(Phase::PostGame, Rule::BrightFrame);
    }

    // Animated banners are not globally bright, so confirm them by OCR.
    if let Some(outcome) = reader.match_outcome(frame) {
        return Classification {
            outcome: Some(outcome),
            ..Classification::of(Phase::PostGame, Rule::OutcomeBanner)
        };
    }

    if has_hud_overlay(frame, &config.layout.kills, thresholds) {
        return Classification::of(Phase::InGame, Rule::HudOverlay);
    }

    Classification::of(Phase::Unknown, Rule::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::hud::testing::FixedText;
    use image::{ImageBuffer, Rgb};

    const W: u32 = 854;
    const H: u32 = 394;

    fn uniform(value: u8) -> RgbImage {
        ImageBuffer::from_pixel(W, H, Rgb([value, value, value]))
    }

    fn classify(engine: &FixedText, frame: &RgbImage) -> Classification {
        let config = AnalyzerConfig::default();
        let reader = HudReader::new(engine, &config);
        classify_frame(&reader, frame)
    }

    #[test]
    fn test_black_frame_is_loading() {
        let result = classify(&FixedText::new(""), &uniform(0));
        assert_eq!(result.phase, Phase::Loading);
        assert_eq!(result.rule, Rule::DarkFrame);
    }

    #[test]
    fn test_bright_frame_is_post_game() {
        let result = classify(&FixedText::new(""), &uniform(200));
        assert_eq!(result.phase, Phase::PostGame);
        assert_eq!(result.rule, Rule::BrightFrame);
        assert_eq!(result.outcome, None);
    }

    #[test]
    fn test_readable_clock_wins_regardless_of_brightness() {
        for value in [0, 60, 200, 255] {
            let result = classify(&FixedText::new("12:34"), &uniform(value));
            assert_eq!(result.phase, Phase::InGame, "brightness {}", value);
            assert_eq!(result.rule, Rule::ClockRead);
            assert_eq!(result.clock, Some(GameClock::from_seconds(754)));
        }
    }

    #[test]
    fn test_outcome_banner_is_post_game() {
        let result = classify(&FixedText::new("VICTORY"), &uniform(80));
        assert_eq!(result.phase, Phase::PostGame);
        assert_eq!(result.rule, Rule::OutcomeBanner);
        assert_eq!(result.outcome, Some(MatchOutcome::Victory));
    }

    #[test]
    fn test_hud_overlay_rescues_unreadable_clock() {
        let mut frame = uniform(60);
        // Lit "# VS #" text inside the kills region (x 597..708, y 0..23).
        for x in 600..640 {
            for y in 5..15 {
                frame.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }

        let result = classify(&FixedText::new(""), &frame);
        assert_eq!(result.phase, Phase::InGame);
        assert_eq!(result.rule, Rule::HudOverlay);
        assert_eq!(result.clock, None);
    }

    #[test]
    fn test_dark_frame_with_lit_scoreboard_is_not_loading() {
        let mut frame = uniform(20);
        let bx = AnalyzerConfig::default().layout.scoreboard.to_pixels(W, H);
        for x in bx.x..bx.x + bx.w {
            for y in bx.y..bx.y + bx.h {
                frame.put_pixel(x, y, Rgb([200, 200, 200]));
            }
        }

        let result = classify(&FixedText::new(""), &frame);
        assert_eq!(result.phase, Phase::InGame);
        assert_eq!(result.rule, Rule::HudOverlay);
    }

    #[test]
    fn test_mid_gray_without_cues_is_unknown() {
        let result = classify(&FixedText::new("garbage"), &uniform(60));
        assert_eq!(result.phase, Phase::Unknown);
        assert_eq!(result.rule, Rule::NoMatch);
    }

    #[test]
    fn test_sparse_bright_pixels_are_not_hud() {
        let thresholds = PhaseThresholds::default();
        let kills = AnalyzerConfig::default().layout.kills;
        let mut frame = uniform(60);
        frame.put_pixel(600, 10, Rgb([255, 255, 255]));

        assert!(!has_hud_overlay(&frame, &kills, &thresholds));
    }

    #[test]
    fn test_degenerate_kills_region_is_not_hud() {
        let thresholds = PhaseThresholds::default();
        let frame = uniform(255);
        assert!(!has_hud_overlay(&frame, &Region::new(0.7, 0.0, 0.0, 0.1), &thresholds));
    }

    #[test]
    fn test_mean_brightness() {
        let gray: GrayImage = ImageBuffer::from_fn(4, 1, |x, _| image::Luma([(x * 10) as u8]));
        assert_eq!(mean_brightness(&gray), 15.0);
        assert_eq!(mean_brightness(&GrayImage::new(0, 0)), 0.0);
    }

    #[test]
    fn test_phase_names() {
        let names: Vec<&str> = Phase::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["loading", "in_game", "post_game", "unknown"]);
        assert_eq!(serde_json::to_string(&Phase::PostGame).unwrap(), "\"post_game\"");
    }
}
