//! Team kill score and player KDA extraction.

use image::RgbImage;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use super::{Attempt, HudReader};
use crate::ocr::{OcrEngine, PageSegMode};

/// "# VS #": V may OCR as v, S as s/5/8.
static KILLS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,3})\s*[Vv][Ss58]\s*([0-9]{1,3})").expect("valid kills pattern")
});

/// "K/D/A" or "K:D:A"; each separator may OCR as / : . ;
static KDA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})[/:.;]([0-9]{1,2})[/:.;]([0-9]{1,2})").expect("valid KDA pattern")
});

/// Blue (left) and red (right) team kill counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TeamKills {
    pub blue: u32,
    pub red: u32,
}

impl fmt::Display for TeamKills {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blue {} vs Red {}", self.blue, self.red)
    }
}

/// Player kills, deaths, assists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerKda {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl fmt::Display for PlayerKda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kills, self.deaths, self.assists)
    }
}

pub fn parse_team_kills(text: &str) -> Option<TeamKills> {
    let caps = KILLS_RE.captures(text)?;
    Some(TeamKills {
        blue: caps[1].parse().ok()?,
        red: caps[2].parse().ok()?,
    })
}

pub fn parse_player_kda(text: &str) -> Option<PlayerKda> {
    let caps = KDA_RE.captures(text)?;
    Some(PlayerKda {
        kills: caps[1].parse().ok()?,
        deaths: caps[2].parse().ok()?,
        assists: caps[3].parse().ok()?,
    })
}

impl<E: OcrEngine + ?Sized> HudReader<'_, E> {
    pub fn kills_attempts(&self) -> [Attempt; 2] {
        let layout = &self.config().layout;
        [
            Attempt::otsu(layout.kills, self.scale(), PageSegMode::SingleLine, None),
            Attempt::otsu(layout.scoreboard, self.scale(), PageSegMode::Block, None),
        ]
    }

    pub fn kda_attempts(&self) -> [Attempt; 2] {
        let layout = &self.config().layout;
        [
            Attempt::otsu(layout.player_kda, self.scale(), PageSegMode::SingleLine, None),
            Attempt::otsu(layout.scoreboard, self.scale(), PageSegMode::Block, None),
        ]
    }

    /// Extracts the team kill score (`# VS #`).
    pub fn team_kills(&self, frame: &RgbImage) -> Option<TeamKills> {
        self.first_match(frame, &self.kills_attempts(), parse_team_kills)
    }

    /// Extracts the player KDA (`K/D/A`).
    pub fn player_kda(&self, frame: &RgbImage) -> Option<PlayerKda> {
        self.first_match(frame, &self.kda_attempts(), parse_player_kda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::hud::testing::Script;
    use image::{ImageBuffer, Rgb};

    fn kills(blue: u32, red: u32) -> Option<TeamKills> {
        Some(TeamKills { blue, red })
    }

    #[test]
    fn test_parse_team_kills() {
        assert_eq!(parse_team_kills("25 VS 29"), kills(25, 29));
        assert_eq!(parse_team_kills("25VS29"), kills(25, 29));
        assert_eq!(parse_team_kills("2 vs 4"), kills(2, 4));
        assert_eq!(parse_team_kills("0 Vs 0"), kills(0, 0));
    }

    #[test]
    fn test_parse_team_kills_misread_s() {
        assert_eq!(parse_team_kills("25V8 29"), kills(25, 29));
        assert_eq!(parse_team_kills("7 V5 12"), kills(7, 12));
    }

    #[test]
    fn test_parse_team_kills_no_match() {
        assert_eq!(parse_team_kills("no kills here"), None);
        assert_eq!(parse_team_kills(""), None);
        assert_eq!(parse_team_kills("12:34"), None);
    }

    #[test]
    fn test_parse_player_kda() {
        let expected = Some(PlayerKda { kills: 3, deaths: 2, assists: 18 });
        assert_eq!(parse_player_kda("3/2/18"), expected);
        assert_eq!(parse_player_kda("3:2:18"), expected);
        assert_eq!(parse_player_kda("3.2:18"), expected);
        assert_eq!(parse_player_kda("KDA 3;2/18 gold"), expected);
    }

    #[test]
    fn test_parse_player_kda_no_match() {
        assert_eq!(parse_player_kda("no kda"), None);
        assert_eq!(parse_player_kda("3/2"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TeamKills { blue: 5, red: 9 }.to_string(), "Blue 5 vs Red 9");
        assert_eq!(PlayerKda { kills: 1, deaths: 0, assists: 7 }.to_string(), "1/0/7");
    }

    #[test]
    fn test_team_kills_fallback_to_scoreboard() {
        let engine = Script::new(&["25 V", "25 VS 29\n12:34"]);
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([10, 10, 10]));

        assert_eq!(HudReader::new(&engine, &config).team_kills(&frame), kills(25, 29));
        assert_eq!(engine.seen.borrow().len(), 2);
    }

    #[test]
    fn test_player_kda_focused_region() {
        let engine = Script::new(&["4/1/9"]);
        let config = AnalyzerConfig::default();
        let frame = ImageBuffer::from_pixel(854, 394, Rgb([10, 10, 10]));

        let kda = HudReader::new(&engine, &config).player_kda(&frame);
        assert_eq!(kda, Some(PlayerKda { kills: 4, deaths: 1, assists: 9 }));

        // 0.07 x 0.06 of 854x394, upscaled 5x
        let seen = engine.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].0, seen[0].1), (295, 115));
    }
}
