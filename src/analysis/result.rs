//! Final analysis result and its summary view.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;

use super::frame::FrameData;
use super::segment::GameSegment;
use crate::hud::{GameClock, MatchOutcome, PlayerKda, TeamKills};
use crate::phase::Phase;

/// Complete analysis output for one video. Built once, never mutated.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    pub source: String,
    pub analysis_date: DateTime<Local>,
    /// Probed video duration in seconds
    pub duration_sec: f64,
    pub games: Vec<GameSegment>,
    pub frame_data: Vec<FrameData>,
}

/// One game in the summary. Kill score and KDA are omitted when never read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub game: usize,
    pub video_start_sec: f64,
    pub video_end_sec: f64,
    pub first_game_time: Option<GameClock>,
    pub last_game_time: Option<GameClock>,
    pub result: Option<MatchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_kills: Option<TeamKills>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_kda: Option<PlayerKda>,
}

/// Compact view of an `AnalysisResult` without the per-frame data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub source: String,
    /// RFC 3339
    pub analysis_date: String,
    pub video_duration_sec: f64,
    pub frames_sampled: usize,
    pub phase_counts: BTreeMap<Phase, usize>,
    pub games_detected: usize,
    pub games: Vec<GameSummary>,
}

impl AnalysisResult {
    /// Number of sampled frames per phase. Phases never seen are omitted.
    pub fn phase_counts(&self) -> BTreeMap<Phase, usize> {
        let mut counts = BTreeMap::new();
        for frame in &self.frame_data {
            *counts.entry(frame.phase()).or_insert(0) += 1;
        }
        counts
    }

    pub fn in_game_frames(&self) -> impl Iterator<Item = &FrameData> {
        self.frame_data.iter().filter(|f| f.is_in_game())
    }

    pub fn summary(&self) -> Summary {
        let games = self
            .games
            .iter()
            .enumerate()
            .map(|(idx, g)| GameSummary {
                game: idx + 1,
                video_start_sec: g.start,
                video_end_sec: g.end,
                first_game_time: g.first_game_time(),
                last_game_time: g.last_game_time(),
                result: g.result,
                final_kills: g.final_team_kills(),
                final_kda: g.final_player_kda(),
            })
            .collect();

        Summary {
            source: self.source.clone(),
            analysis_date: self.analysis_date.to_rfc3339(),
            video_duration_sec: self.duration_sec,
            frames_sampled: self.frame_data.len(),
            phase_counts: self.phase_counts(),
            games_detected: self.games.len(),
            games,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::frame::{FrameState, HudReadings};
    use crate::analysis::segment::segment_games;

    fn sample_result() -> AnalysisResult {
        let mut frames = vec![FrameData::new(0.0, FrameState::Loading)];
        for ts in (10..200).step_by(10) {
            let readings = HudReadings {
                game_time: Some(GameClock::from_seconds(ts)),
                team_kills: (ts >= 100).then_some(TeamKills { blue: 4, red: 7 }),
                player_kda: None,
            };
            frames.push(FrameData::new(ts as f64, FrameState::InGame(readings)));
        }
        let outcome = Some(MatchOutcome::Defeat);
        frames.push(FrameData::new(200.0, FrameState::PostGame { outcome }));
        frames.push(FrameData::new(210.0, FrameState::Unknown));

        let mut games = segment_games(&frames, 30.0, 60.0);
        crate::analysis::segment::attach_outcomes(&mut games, &frames);

        AnalysisResult {
            source: "match.mp4".to_string(),
            analysis_date: Local::now(),
            duration_sec: 215.0,
            games,
            frame_data: frames,
        }
    }

    #[test]
    fn test_phase_counts() {
        let counts = sample_result().phase_counts();
        assert_eq!(counts.get(&Phase::Loading), Some(&1));
        assert_eq!(counts.get(&Phase::InGame), Some(&19));
        assert_eq!(counts.get(&Phase::PostGame), Some(&1));
        assert_eq!(counts.get(&Phase::Unknown), Some(&1));
    }

    #[test]
    fn test_summary_games() {
        let summary = sample_result().summary();
        assert_eq!(summary.frames_sampled, 22);
        assert_eq!(summary.games_detected, 1);

        let game = &summary.games[0];
        assert_eq!(game.game, 1);
        assert_eq!(game.video_start_sec, 10.0);
        assert_eq!(game.video_end_sec, 190.0);
        assert_eq!(game.first_game_time, Some(GameClock::from_seconds(10)));
        assert_eq!(game.last_game_time, Some(GameClock::from_seconds(190)));
        assert_eq!(game.result, Some(MatchOutcome::Defeat));
        assert_eq!(game.final_kills, Some(TeamKills { blue: 4, red: 7 }));
        assert_eq!(game.final_kda, None);
    }

    #[test]
    fn test_summary_json_shape() {
        let value = serde_json::to_value(sample_result().summary()).unwrap();

        assert_eq!(value["source"], "match.mp4");
        assert_eq!(value["phase_counts"]["in_game"], 19);
        assert_eq!(value["games"][0]["first_game_time"], "0:10");
        assert_eq!(value["games"][0]["last_game_time"], "3:10");
        assert_eq!(value["games"][0]["result"], "defeat");
        assert_eq!(value["games"][0]["final_kills"]["red"], 7);
        assert!(value["games"][0].get("final_kda").is_none());
        assert!(
            chrono::DateTime::parse_from_rfc3339(value["analysis_date"].as_str().unwrap()).is_ok()
        );
    }
}
