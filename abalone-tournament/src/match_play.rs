//! Match play - multiple games between two player configurations
//!
//! Level 2 - Phase-level implementation

use abalone_core::{Player, Position};
use rayon::prelude::*;

use crate::config::{AiConfig, MatchConfig};
use crate::game_runner::{play_game, GameOutcome};
use crate::records::GameRecord;

/// Result of a match (multiple games), seen from the first configuration
#[derive(Clone, Debug, Default)]
pub struct MatchResult {
    /// Name of the first configuration
    pub first: String,
    /// Name of the second configuration
    pub second: String,
    /// Wins for the first configuration
    pub first_wins: u32,
    /// Wins for the second configuration
    pub second_wins: u32,
    /// Games that ended without a winner
    pub draws: u32,
    /// Average game length in plies
    pub avg_plies: f32,
    /// Average final distance to center of the first configuration's marbles
    pub avg_first_centrality: f32,
    /// Total games played
    pub games_played: u32,
    /// One record per game, in game order
    pub records: Vec<GameRecord>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty(first: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            ..Default::default()
        }
    }

    /// Get win rate for the first configuration
    pub fn first_win_rate(&self) -> f32 {
        self.rate(self.first_wins)
    }

    /// Get win rate for the second configuration
    pub fn second_win_rate(&self) -> f32 {
        self.rate(self.second_wins)
    }

    /// Get draw rate
    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    fn rate(&self, count: u32) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            count as f32 / self.games_played as f32
        }
    }
}

/// Play a match between two configurations (Level 2 phase)
///
/// Colors alternate each game; the first configuration has Black in even
/// games. Game `i` is seeded with `config.seed + i`, so sequential and
/// parallel runs produce the same games. In a mirror match the second
/// configuration is renamed `<name>-2` so records stay attributable.
pub fn play_match(first: &AiConfig, second: &AiConfig, config: &MatchConfig) -> MatchResult {
    let renamed;
    let second = if second.name == first.name {
        renamed = second.clone().with_name(format!("{}-2", second.name));
        &renamed
    } else {
        second
    };

    if config.games == 0 {
        return MatchResult::empty(&first.name, &second.name);
    }

    let game_configs = prepare_game_configs(config);
    let results = if config.parallel {
        execute_games_parallel(first, second, config, &game_configs)
    } else {
        execute_games(first, second, config, &game_configs)
    };
    aggregate_results(first, second, results)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy)]
struct GameConfig {
    /// Whether the first configuration plays Black this game
    first_is_black: bool,
    /// Game index (for seeding)
    game_index: usize,
}

/// Prepare game configurations for a match
fn prepare_game_configs(config: &MatchConfig) -> Vec<GameConfig> {
    (0..config.games)
        .map(|i| GameConfig {
            first_is_black: i % 2 == 0, // Alternate colors
            game_index: i,
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(
    first: &AiConfig,
    second: &AiConfig,
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Vec<GameOutcomeWithContext> {
    game_configs
        .iter()
        .map(|gc| play_single_game(first, second, config, gc))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    first: &AiConfig,
    second: &AiConfig,
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Vec<GameOutcomeWithContext> {
    game_configs
        .par_iter()
        .map(|gc| play_single_game(first, second, config, gc))
        .collect()
}

/// Outcome with context about which configuration played which color
#[derive(Clone)]
struct GameOutcomeWithContext {
    outcome: GameOutcome,
    first_is_black: bool,
    game_index: usize,
}

/// Play a single game with the given configuration
fn play_single_game(
    first: &AiConfig,
    second: &AiConfig,
    config: &MatchConfig,
    gc: &GameConfig,
) -> GameOutcomeWithContext {
    let (black, white) = if gc.first_is_black {
        (first, second)
    } else {
        (second, first)
    };
    let seed = config.seed.wrapping_add(gc.game_index as u64);
    let initial = Position::initial().with_max_plies(config.max_plies);

    let outcome = play_game(black, white, initial, config.opening_plies, seed);

    tracing::info!(
        game = gc.game_index,
        black = %black.name,
        white = %white.name,
        result = ?outcome.result,
        plies = outcome.plies,
        "game complete"
    );

    GameOutcomeWithContext {
        outcome,
        first_is_black: gc.first_is_black,
        game_index: gc.game_index,
    }
}

/// Aggregate game outcomes into match result
fn aggregate_results(
    first: &AiConfig,
    second: &AiConfig,
    results: Vec<GameOutcomeWithContext>,
) -> MatchResult {
    let mut match_result = MatchResult::empty(&first.name, &second.name);
    let mut total_plies = 0u64;
    let mut total_centrality = 0.0f32;

    for ctx in results {
        let first_color = if ctx.first_is_black {
            Player::Black
        } else {
            Player::White
        };
        match ctx.outcome.winner() {
            Some(winner) if winner == first_color => match_result.first_wins += 1,
            Some(_) => match_result.second_wins += 1,
            None => match_result.draws += 1,
        }
        total_plies += ctx.outcome.plies as u64;

        let (black, white) = if ctx.first_is_black {
            (first, second)
        } else {
            (second, first)
        };
        let record = GameRecord::from_outcome(ctx.game_index, &black.name, &white.name, &ctx.outcome);
        total_centrality += record.centrality(first_color);
        match_result.records.push(record);
        match_result.games_played += 1;
    }

    if match_result.games_played > 0 {
        let games = match_result.games_played as f32;
        match_result.avg_plies = total_plies as f32 / games;
        match_result.avg_first_centrality = total_centrality / games;
    }

    tracing::info!(
        first = %match_result.first,
        second = %match_result.second,
        first_wins = match_result.first_wins,
        second_wins = match_result.second_wins,
        draws = match_result.draws,
        "match complete"
    );

    match_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::summarize;

    fn quick_match(games: usize) -> MatchConfig {
        MatchConfig::new(games).with_max_plies(6).with_opening_plies(0)
    }

    #[test]
    fn test_prepare_game_configs_alternates_colors() {
        let configs = prepare_game_configs(&MatchConfig::new(4));
        assert_eq!(configs.len(), 4);
        assert!(configs[0].first_is_black);
        assert!(!configs[1].first_is_black);
        assert!(configs[2].first_is_black);
        assert!(!configs[3].first_is_black);
    }

    #[test]
    fn test_empty_match() {
        let result = play_match(&AiConfig::random(), &AiConfig::greedy(), &MatchConfig::new(0));
        assert_eq!(result.games_played, 0);
        assert_eq!(result.first_win_rate(), 0.0);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_match_counts_every_game() {
        let result = play_match(
            &AiConfig::greedy(),
            &AiConfig::random(),
            &quick_match(4).sequential(),
        );
        assert_eq!(result.games_played, 4);
        assert_eq!(result.first_wins + result.second_wins + result.draws, 4);
        assert_eq!(result.records.len(), 4);
        assert!((result.avg_plies - 6.0).abs() < 1e-6);
        assert!(result.avg_first_centrality > 0.0);

        assert_eq!(result.records[0].black, "greedy");
        assert_eq!(result.records[1].black, "random");
    }

    #[test]
    fn test_mirror_match_records_are_attributable() {
        let player = AiConfig::random();
        let result = play_match(&player, &player, &quick_match(4).sequential());
        assert_eq!(result.first, "random");
        assert_eq!(result.second, "random-2");
        assert_eq!(result.records[0].white, "random-2");
        assert_eq!(result.records[1].black, "random-2");

        let first = summarize(&result.records, &result.first);
        let second = summarize(&result.records, &result.second);
        assert_eq!(first.games, 4);
        assert_eq!(second.games, 4);
        assert_eq!(first.won, second.lost);
        assert_eq!(first.lost, second.won);
        assert_eq!(first.won, result.first_wins);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = quick_match(4).with_opening_plies(2);
        let par = play_match(&AiConfig::greedy(), &AiConfig::random(), &config);
        let seq = play_match(&AiConfig::greedy(), &AiConfig::random(), &config.clone().sequential());
        assert_eq!(par.first_wins, seq.first_wins);
        assert_eq!(par.draws, seq.draws);
        let par_moves: Vec<_> = par.records.iter().map(|r| r.moves.clone()).collect();
        let seq_moves: Vec<_> = seq.records.iter().map(|r| r.moves.clone()).collect();
        assert_eq!(par_moves, seq_moves);
    }
}
