//! Human-readable text report.

use std::fmt;

use super::result::AnalysisResult;

/// Display adapter that renders an `AnalysisResult` as a plain-text report.
pub struct TextReport<'a>(pub &'a AnalysisResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "Video:    {}  ({:.1} min)", result.source, result.duration_sec / 60.0)?;
        writeln!(f, "Sampled:  {} frames", result.frame_data.len())?;

        // Most frequent first, ties in phase order.
        let mut phases: Vec<_> = result.phase_counts().into_iter().collect();
        phases.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let phase_line: Vec<String> = phases.iter().map(|(p, n)| format!("{}: {}", p, n)).collect();
        writeln!(f, "Phases:   {}", phase_line.join(", "))?;

        let in_game: Vec<_> = result.in_game_frames().collect();
        let (Some(first), Some(last)) = (in_game.first(), in_game.last()) else {
            return writeln!(f, "\nNo in-game frames detected.");
        };

        writeln!(f, "\nIn-game frames: {}", in_game.len())?;
        writeln!(f, "Video span:     {:.0}s - {:.0}s", first.timestamp, last.timestamp)?;

        let clocks: Vec<_> = in_game
            .iter()
            .filter_map(|fr| fr.game_time().map(|c| (fr.timestamp, c)))
            .collect();
        if !clocks.is_empty() {
            writeln!(f, "\nGame clock ({} readings):", clocks.len())?;
            for (ts, clock) in clocks {
                writeln!(f, "  video {:>7.0}s  ->  {}", ts, clock)?;
            }
        }

        let kills: Vec<_> = in_game
            .iter()
            .filter_map(|fr| fr.team_kills().map(|k| (fr.timestamp, k)))
            .collect();
        if !kills.is_empty() {
            writeln!(f, "\nTeam kills ({} readings):", kills.len())?;
            for (ts, k) in kills {
                writeln!(f, "  video {:>7.0}s  ->  Blue {:>2}  vs  Red {:>2}", ts, k.blue, k.red)?;
            }
        }

        let kdas: Vec<_> = in_game
            .iter()
            .filter_map(|fr| fr.player_kda().map(|k| (fr.timestamp, k)))
            .collect();
        if !kdas.is_empty() {
            writeln!(f, "\nPlayer KDA ({} readings):", kdas.len())?;
            for (ts, kda) in kdas {
                writeln!(f, "  video {:>7.0}s  ->  {}", ts, kda)?;
            }
        }

        if result.games.is_empty() {
            return writeln!(f, "\nNo game segments detected (frames too sparse or short).");
        }

        writeln!(f, "\nGames detected: {}", result.games.len())?;
        for (idx, game) in result.games.iter().enumerate() {
            let outcome = game
                .result
                .map(|o| o.to_string().to_uppercase())
                .unwrap_or_else(|| "UNKNOWN".to_string());
            writeln!(
                f,
                "\n  Game {}  [{}]  (video {:.0}s - {:.0}s, {:.1} min span)",
                idx + 1,
                outcome,
                game.start,
                game.end,
                game.duration() / 60.0
            )?;
            if let Some(clock) = game.first_game_time() {
                writeln!(f, "    First clock: {}", clock)?;
            }
            if let Some(clock) = game.last_game_time() {
                writeln!(f, "    Last clock:  {}", clock)?;
            }
            if let Some(kills) = game.final_team_kills() {
                writeln!(f, "    Final kills: {}", kills)?;
            }
            if let Some(kda) = game.final_player_kda() {
                writeln!(f, "    Final KDA:   {}", kda)?;
            }
        }
        Ok(())
    }
}

/// Renders the full text report.
pub fn render_text(result: &AnalysisResult) -> String {
    TextReport(result).to_string()
}
