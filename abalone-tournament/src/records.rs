//! Game records - JSON persistence and after-the-fact analysis
//!
//! Level 4 - Utilities

use std::fs;
use std::path::{Path, PathBuf};

use abalone_core::{DistanceOracle, GameResult, Move, Player, Position, CENTER};
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::game_runner::GameOutcome;

/// One finished game, as written to disk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Index of the game within its match
    pub game: usize,
    /// Configuration name playing Black
    pub black: String,
    /// Configuration name playing White
    pub white: String,
    pub result: GameResult,
    pub plies: u32,
    /// Ply limit the game was played under
    pub max_plies: u16,
    /// Every move from the opening position
    pub moves: Vec<Move>,
    /// Marbles pushed off by Black
    pub black_captures: u8,
    /// Marbles pushed off by White
    pub white_captures: u8,
    /// Summed distance to center of Black's final marbles
    pub black_center_distance: u32,
    /// Summed distance to center of White's final marbles
    pub white_center_distance: u32,
    /// Black marbles left on the board
    pub black_pieces: u8,
    /// White marbles left on the board
    pub white_pieces: u8,
    /// Milliseconds spent on each move
    pub think_ms: Vec<u64>,
}

impl GameRecord {
    pub fn from_outcome(game: usize, black: &str, white: &str, outcome: &GameOutcome) -> Self {
        let position = &outcome.final_position;
        Self {
            game,
            black: black.to_string(),
            white: white.to_string(),
            result: outcome.result,
            plies: outcome.plies,
            max_plies: position.max_plies,
            moves: outcome.moves.clone(),
            black_captures: position.captures(Player::Black),
            white_captures: position.captures(Player::White),
            black_center_distance: center_distance(position, Player::Black),
            white_center_distance: center_distance(position, Player::White),
            black_pieces: position.piece_count(Player::Black),
            white_pieces: position.piece_count(Player::White),
            think_ms: outcome.think_ms.clone(),
        }
    }

    /// Color played by `name`, if it took part
    pub fn color_of(&self, name: &str) -> Option<Player> {
        if self.black == name {
            Some(Player::Black)
        } else if self.white == name {
            Some(Player::White)
        } else {
            None
        }
    }

    pub fn center_distance(&self, player: Player) -> u32 {
        match player {
            Player::Black => self.black_center_distance,
            Player::White => self.white_center_distance,
        }
    }

    /// Mean distance to center of `player`'s final marbles
    pub fn centrality(&self, player: Player) -> f32 {
        let pieces = match player {
            Player::Black => self.black_pieces,
            Player::White => self.white_pieces,
        };
        if pieces == 0 {
            0.0
        } else {
            self.center_distance(player) as f32 / pieces as f32
        }
    }

    /// Rebuild the final position by replaying the moves
    pub fn final_position(&self) -> Position {
        self.moves
            .iter()
            .fold(Position::initial().with_max_plies(self.max_plies), |pos, &mv| {
                pos.apply_move(mv)
            })
    }
}

fn center_distance(position: &Position, player: Player) -> u32 {
    let oracle = DistanceOracle::global();
    position
        .pieces(player)
        .map(|c| oracle.distance(c, CENTER) as u32)
        .sum()
}

/// Write each record to `dir/game_NNNN.json`, creating `dir` if needed
pub fn save_records(dir: &Path, records: &[GameRecord]) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create record directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let path = dir.join(format!("game_{:04}.json", record.game));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write record: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Load every `*.json` record in `dir`, sorted by file name
pub fn load_records(dir: &Path) -> anyhow::Result<Vec<GameRecord>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read record directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| -> anyhow::Result<GameRecord> {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read record: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid record: {}", path.display()))
        })
        .collect()
}

/// Win/loss tally for one player over a set of records
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub player: String,
    /// Records the player took part in
    pub games: u32,
    pub won: u32,
    pub lost: u32,
    /// Games with equal captures
    pub draws: u32,
    /// Draws where the player ended closer to the center than the opponent
    pub closer_on_draws: u32,
    /// Mean over games of the player's final mean distance to center
    pub avg_final_centrality: f32,
}

impl RecordSummary {
    pub fn win_rate(&self) -> f32 {
        if self.games == 0 {
            0.0
        } else {
            self.won as f32 / self.games as f32
        }
    }
}

/// Tally results for `player` across `records`.
///
/// Records the player did not take part in are skipped. Games are decided
/// on captures; an equal capture count is a draw, and draws are further
/// split by who finished closer to the center.
pub fn summarize(records: &[GameRecord], player: &str) -> RecordSummary {
    let mut summary = RecordSummary {
        player: player.to_string(),
        ..Default::default()
    };
    let mut total_centrality = 0.0f32;

    for record in records {
        let Some(color) = record.color_of(player) else {
            continue;
        };
        let (mine, theirs) = match color {
            Player::Black => (record.black_captures, record.white_captures),
            Player::White => (record.white_captures, record.black_captures),
        };

        summary.games += 1;
        if mine > theirs {
            summary.won += 1;
        } else if mine < theirs {
            summary.lost += 1;
        } else {
            summary.draws += 1;
            if record.center_distance(color) < record.center_distance(color.opponent()) {
                summary.closer_on_draws += 1;
            }
        }
        total_centrality += record.centrality(color);
    }

    if summary.games > 0 {
        summary.avg_final_centrality = total_centrality / summary.games as f32;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game: usize, black: &str, white: &str, captures: (u8, u8), dist: (u32, u32)) -> GameRecord {
        GameRecord {
            game,
            black: black.to_string(),
            white: white.to_string(),
            result: GameResult::Draw,
            plies: 50,
            max_plies: 50,
            moves: vec![],
            black_captures: captures.0,
            white_captures: captures.1,
            black_center_distance: dist.0,
            white_center_distance: dist.1,
            black_pieces: 14 - captures.1,
            white_pieces: 14 - captures.0,
            think_ms: vec![],
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("abalone-records-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_summarize_counts_by_color() {
        let records = vec![
            record(0, "ab", "random", (2, 0), (30, 40)),
            record(1, "random", "ab", (1, 3), (30, 40)),
            record(2, "random", "ab", (1, 1), (30, 20)),
            record(3, "ab", "random", (0, 1), (30, 20)),
            record(4, "x", "y", (5, 0), (0, 0)),
        ];
        let summary = summarize(&records, "ab");
        assert_eq!(summary.games, 4);
        assert_eq!(summary.won, 2);
        assert_eq!(summary.lost, 1);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.closer_on_draws, 1);
        assert!((summary.win_rate() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_summarize_unknown_player() {
        let records = vec![record(0, "a", "b", (0, 0), (10, 10))];
        let summary = summarize(&records, "nobody");
        assert_eq!(summary.games, 0);
        assert_eq!(summary.avg_final_centrality, 0.0);
    }

    #[test]
    fn test_save_and_load_records() {
        let dir = temp_dir("roundtrip");
        let records = vec![
            record(1, "a", "b", (1, 0), (10, 12)),
            record(0, "b", "a", (0, 0), (11, 9)),
        ];
        let written = save_records(&dir, &records).unwrap();
        assert_eq!(written.len(), 2);

        let loaded = load_records(&dir).unwrap();
        assert_eq!(loaded.len(), 2);
        // Sorted by file name, so game 0 first
        assert_eq!(loaded[0], records[1]);
        assert_eq!(loaded[1], records[0]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = temp_dir("bad");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("game_0000.json"), "{ not json").unwrap();
        assert!(load_records(&dir).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_final_position_replays_moves() {
        let start = Position::initial().with_max_plies(20);
        let mut pos = start.clone();
        let mut moves = Vec::new();
        for _ in 0..4 {
            let mv = pos.legal_moves()[0];
            moves.push(mv);
            pos = pos.apply_move(mv);
        }
        let rec = GameRecord {
            max_plies: 20,
            moves,
            ..record(0, "a", "b", (0, 0), (0, 0))
        };
        assert_eq!(rec.final_position(), pos);
    }
}
