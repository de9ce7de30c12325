//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use std::time::Instant;

use abalone_core::{
    Abalone, AlphaBetaAI, DistanceOracle, Evaluate, Evaluator, GameResult, Move, Player, Position,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::{AiConfig, PlayerType};

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// Final game result
    pub result: GameResult,
    /// Plies played, opening included
    pub plies: u32,
    /// Move history
    pub moves: Vec<Move>,
    /// Position the game ended in
    pub final_position: Position,
    /// Milliseconds spent choosing each move (0 for opening plies)
    pub think_ms: Vec<u64>,
}

impl GameOutcome {
    pub fn black_wins(&self) -> bool {
        self.result == GameResult::BlackWins
    }

    pub fn white_wins(&self) -> bool {
        self.result == GameResult::WhiteWins
    }

    /// Drawn or stopped before a decision
    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    /// Get winner (None for draw)
    pub fn winner(&self) -> Option<Player> {
        self.result.winner()
    }
}

/// A configured player instance
pub enum AiPlayer {
    AlphaBeta(Box<AlphaBetaAI<Abalone, Evaluator>>),
    Greedy(Evaluator),
    Random(ChaCha8Rng),
}

impl AiPlayer {
    /// Create an AI player from config
    pub fn from_config(config: &AiConfig, seed: u64) -> Self {
        let evaluator = Evaluator::new(DistanceOracle::global(), config.weights.clone());
        match config.player_type {
            PlayerType::AlphaBeta => AiPlayer::AlphaBeta(Box::new(AlphaBetaAI::new(
                Abalone,
                evaluator,
                config.search.clone(),
            ))),
            PlayerType::Greedy => AiPlayer::Greedy(evaluator),
            PlayerType::Random => {
                AiPlayer::Random(ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(seed)))
            }
        }
    }

    /// Get move from AI player
    pub fn choose(&mut self, position: &Position) -> Option<Move> {
        match self {
            AiPlayer::AlphaBeta(ai) => ai.best_move(position),
            AiPlayer::Greedy(evaluator) => greedy_move(evaluator, position),
            AiPlayer::Random(rng) => position.legal_moves().choose(rng).copied(),
        }
    }
}

/// Move whose successor evaluates best for the side to move
fn greedy_move(evaluator: &Evaluator, position: &Position) -> Option<Move> {
    let me = position.current_player();
    position
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let score = evaluator.evaluate(&position.apply_move(mv), me, me.opponent());
            (mv, score)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(mv, _)| mv)
}

/// Play a game with separate AI configs for black and white
pub fn play_game(
    black_config: &AiConfig,
    white_config: &AiConfig,
    initial: Position,
    opening_plies: usize,
    seed: u64,
) -> GameOutcome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut black = AiPlayer::from_config(black_config, seed.wrapping_add(1));
    let mut white = AiPlayer::from_config(white_config, seed.wrapping_add(2));

    let mut position = initial;
    let mut moves = Vec::new();
    let mut think_ms = Vec::new();

    while !position.is_terminal() {
        let started = Instant::now();
        let mv = if moves.len() < opening_plies {
            position.legal_moves().choose(&mut rng).copied()
        } else {
            match position.current_player() {
                Player::Black => black.choose(&position),
                Player::White => white.choose(&position),
            }
        };

        let Some(mv) = mv else {
            tracing::warn!(ply = position.ply, "no legal move in a running game");
            break;
        };
        think_ms.push(if moves.len() < opening_plies {
            0
        } else {
            started.elapsed().as_millis() as u64
        });
        position = position.apply_move(mv);
        moves.push(mv);
    }

    tracing::debug!(
        result = ?position.result(),
        plies = moves.len(),
        black = %black_config.name,
        white = %white_config.name,
        "game finished"
    );

    GameOutcome {
        result: position.result(),
        plies: moves.len() as u32,
        moves,
        final_position: position,
        think_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quick_ab() -> AiConfig {
        AiConfig::alpha_beta(1).with_time_limit(Duration::from_secs(10))
    }

    #[test]
    fn test_game_outcome_winner() {
        let outcome = GameOutcome {
            result: GameResult::WhiteWins,
            plies: 10,
            moves: vec![],
            final_position: Position::initial(),
            think_ms: vec![],
        };
        assert_eq!(outcome.winner(), Some(Player::White));
        assert!(outcome.white_wins());
        assert!(!outcome.black_wins());

        let draw = GameOutcome {
            result: GameResult::Draw,
            ..outcome
        };
        assert_eq!(draw.winner(), None);
        assert!(draw.is_draw());
    }

    #[test]
    fn test_play_game_alpha_beta_vs_random() {
        let initial = Position::initial().with_max_plies(10);
        let outcome = play_game(&quick_ab(), &AiConfig::random(), initial, 0, 42);

        assert_eq!(outcome.plies, 10);
        assert_eq!(outcome.moves.len(), 10);
        assert_eq!(outcome.think_ms.len(), 10);
        assert!(outcome.final_position.is_terminal());
        assert_ne!(outcome.result, GameResult::Ongoing);
    }

    #[test]
    fn test_same_seed_same_game() {
        let initial = Position::initial().with_max_plies(8);
        let a = play_game(&AiConfig::greedy(), &AiConfig::random(), initial.clone(), 2, 9);
        let b = play_game(&AiConfig::greedy(), &AiConfig::random(), initial, 2, 9);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.result, b.result);
    }

    #[test]
    fn test_opening_plies_are_untimed() {
        let initial = Position::initial().with_max_plies(4);
        let outcome = play_game(&AiConfig::greedy(), &AiConfig::greedy(), initial, 3, 1);
        assert_eq!(&outcome.think_ms[..3], &[0, 0, 0]);
    }

    #[test]
    fn test_greedy_takes_capture() {
        use abalone_core::{Cell, Direction};
        let cell = |x, y| Cell::new(x, y).unwrap();
        let black = [cell(8, 4), cell(10, 4), cell(12, 4)];
        let white = [cell(14, 4), cell(16, 4)];
        let pos = Position::from_cells(&black, &white, Player::Black);
        let mv = greedy_move(&Evaluator::default(), &pos);
        assert_eq!(mv, Some(Move::inline(cell(8, 4), 3, Direction::E)));
    }
}
