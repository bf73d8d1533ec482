//! Per-frame analysis.

use image::RgbImage;
use serde::{Serialize, Serializer};

use crate::hud::{GameClock, HudReader, MatchOutcome, PlayerKda, TeamKills};
use crate::ocr::OcrEngine;
use crate::phase::{classify_frame, Phase, Rule};

/// HUD values read from an in-game frame. Each may be missing on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudReadings {
    pub game_time: Option<GameClock>,
    pub team_kills: Option<TeamKills>,
    pub player_kda: Option<PlayerKda>,
}

/// Phase-tagged frame state. Only `InGame` carries HUD readings, so a
/// loading or post-game frame cannot hold a clock, score or KDA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Loading,
    InGame(HudReadings),
    PostGame { outcome: Option<MatchOutcome> },
    Unknown,
}

/// Data extracted from one sampled frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameData {
    pub timestamp: f64,
    pub state: FrameState,
}

impl FrameData {
    pub fn new(timestamp: f64, state: FrameState) -> Self {
        Self { timestamp, state }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            FrameState::Loading => Phase::Loading,
            FrameState::InGame(_) => Phase::InGame,
            FrameState::PostGame { .. } => Phase::PostGame,
            FrameState::Unknown => Phase::Unknown,
        }
    }

    pub fn is_in_game(&self) -> bool {
        matches!(self.state, FrameState::InGame(_))
    }

    pub fn hud(&self) -> Option<&HudReadings> {
        match &self.state {
            FrameState::InGame(readings) => Some(readings),
            _ => None,
        }
    }

    pub fn game_time(&self) -> Option<GameClock> {
        self.hud().and_then(|h| h.game_time)
    }

    pub fn team_kills(&self) -> Option<TeamKills> {
        self.hud().and_then(|h| h.team_kills)
    }

    pub fn player_kda(&self) -> Option<PlayerKda> {
        self.hud().and_then(|h| h.player_kda)
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.state {
            FrameState::PostGame { outcome } => outcome,
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct FrameRecord {
    timestamp: f64,
    phase: Phase,
    game_time: Option<GameClock>,
    team_kills: Option<TeamKills>,
    player_kda: Option<PlayerKda>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<MatchOutcome>,
}

impl Serialize for FrameData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FrameRecord {
            timestamp: self.timestamp,
            phase: self.phase(),
            game_time: self.game_time(),
            team_kills: self.team_kills(),
            player_kda: self.player_kda(),
            outcome: self.outcome(),
        }
        .serialize(serializer)
    }
}

/// Classifies a frame and, only when it is in-game, reads the HUD fields.
///
/// The clock comes from the classifier: when the in-game call came from the
/// HUD overlay rule the clock parser has already missed on this very frame.
/// Post-game frames record the match outcome, read here if the cascade
/// decided on brightness alone.
pub fn analyze_frame<E: OcrEngine + ?Sized>(
    reader: &HudReader<'_, E>,
    frame: &RgbImage,
    timestamp: f64,
) -> FrameData {
    let classification = classify_frame(reader, frame);
    log::debug!(
        "t={:.1}s phase={} rule={:?}",
        timestamp,
        classification.phase,
        classification.rule
    );

    let state = match classification.phase {
        Phase::InGame => FrameState::InGame(HudReadings {
            game_time: classification.clock,
            team_kills: reader.team_kills(frame),
            player_kda: reader.player_kda(frame),
        }),
        Phase::PostGame => {
            let outcome = match classification.rule {
                Rule::OutcomeBanner => classification.outcome,
                _ => reader.match_outcome(frame),
            };
            FrameState::PostGame { outcome }
        }
        Phase::Loading => FrameState::Loading,
        Phase::Unknown => FrameState::Unknown,
    };

    FrameData::new(timestamp, state)
}
