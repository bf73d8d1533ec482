//! Game segmentation over the sampled frame timeline.

use serde::Serialize;

use super::frame::FrameData;
use crate::hud::{GameClock, MatchOutcome, PlayerKda, TeamKills};

/// A contiguous stretch of in-game frames.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSegment {
    pub start: f64,
    pub end: f64,
    /// Outcome read from the post-game screens that follow the segment
    pub result: Option<MatchOutcome>,
    pub frames: Vec<FrameData>,
}

impl GameSegment {
    fn open(first: FrameData) -> Self {
        Self {
            start: first.timestamp,
            end: first.timestamp,
            result: None,
            frames: vec![first],
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn first_game_time(&self) -> Option<GameClock> {
        self.frames.iter().find_map(FrameData::game_time)
    }

    pub fn last_game_time(&self) -> Option<GameClock> {
        self.frames.iter().rev().find_map(FrameData::game_time)
    }

    pub fn final_team_kills(&self) -> Option<TeamKills> {
        self.frames.iter().rev().find_map(FrameData::team_kills)
    }

    pub fn final_player_kda(&self) -> Option<PlayerKda> {
        self.frames.iter().rev().find_map(FrameData::player_kda)
    }
}

/// Groups in-game frames into game segments.
///
/// `frames` must be sorted by timestamp. A new segment starts whenever the
/// next in-game frame lies more than `gap_sec` after the open segment's end.
/// Segments shorter than `min_duration_sec` are dropped as noise.
pub fn segment_games(
    frames: &[FrameData],
    gap_sec: f64,
    min_duration_sec: f64,
) -> Vec<GameSegment> {
    let mut in_game = frames.iter().filter(|f| f.is_in_game());
    let Some(first) = in_game.next() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut current = GameSegment::open(*first);

    for frame in in_game {
        if frame.timestamp - current.end > gap_sec {
            segments.push(std::mem::replace(&mut current, GameSegment::open(*frame)));
            continue;
        }
        current.end = frame.timestamp;
        current.frames.push(*frame);
    }
    segments.push(current);

    let total = segments.len();
    segments.retain(|s| s.duration() >= min_duration_sec);
    if segments.len() < total {
        log::debug!(
            "Dropped {} segment(s) shorter than {:.0}s",
            total - segments.len(),
            min_duration_sec
        );
    }
    segments
}

/// Sets each segment's result from the first post-game outcome sampled after
/// it ends and before in-game play resumes.
pub fn attach_outcomes(segments: &mut [GameSegment], frames: &[FrameData]) {
    for segment in segments.iter_mut() {
        segment.result = frames
            .iter()
            .skip_while(|f| f.timestamp <= segment.end)
            .take_while(|f| !f.is_in_game())
            .find_map(FrameData::outcome);
    }
}
