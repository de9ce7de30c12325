//! Position evaluation
//!
//! The score combines four signals measured from the viewer's side:
//! material, centrality, cohesion (own and opponent) and progress. Which
//! weight set applies depends on a coarse game phase picked from the
//! viewer's centrality and cohesion.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, CENTER, MAX_DISTANCE};
use crate::distance::DistanceOracle;
use crate::game::{Abalone, GameResult, Player, Position, MARBLES_PER_PLAYER};
use crate::rules::GameRules;

/// Evaluation score, higher is better for the viewer
pub type Score = f32;

/// Lower sentinel, below every real evaluation
pub const SCORE_MIN: Score = f32::NEG_INFINITY;

/// Upper sentinel, above every real evaluation
pub const SCORE_MAX: Score = f32::INFINITY;

/// Bonus for a decided game (effectively infinite)
pub const WIN_VALUE: Score = 100000.0;

/// Scores a position for `viewer` against `opponent`.
///
/// Implementations must be pure: same inputs, same score, no shared
/// mutable state.
pub trait Evaluate<R: GameRules> {
    fn evaluate(&self, position: &R::Position, viewer: R::Player, opponent: R::Player) -> Score;
}

// ============================================================================
// WEIGHTS
// ============================================================================

/// Weight quadruple plus progress term for one phase
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseWeights {
    pub material: f32,
    pub centrality: f32,
    pub cohesion: f32,
    pub opponent_cohesion: f32,
    pub progress: f32,
}

/// Phase decision thresholds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Mean distance to center above which the viewer is still approaching
    pub centrality: f32,
    /// Cohesion below which the viewer regroups before attacking
    pub cohesion: f32,
}

/// Coarse game phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Marbles far from the center: occupy it
    Approach,
    /// Central but scattered: close ranks
    Regroup,
    /// Central and compact: push for material
    Attack,
}

/// Tunable evaluation weights
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub approach: PhaseWeights,
    pub regroup: PhaseWeights,
    pub attack: PhaseWeights,
    pub thresholds: PhaseThresholds,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            approach: PhaseWeights {
                material: 10.0,
                centrality: 3.0,
                cohesion: 1.0,
                opponent_cohesion: 0.5,
                progress: 1.0,
            },
            regroup: PhaseWeights {
                material: 10.0,
                centrality: 1.5,
                cohesion: 3.0,
                opponent_cohesion: 1.0,
                progress: 1.0,
            },
            attack: PhaseWeights {
                material: 15.0,
                centrality: 1.0,
                cohesion: 1.5,
                opponent_cohesion: 2.0,
                progress: 2.0,
            },
            thresholds: PhaseThresholds {
                centrality: 2.5,
                cohesion: 0.6,
            },
        }
    }
}

impl Weights {
    /// Weight set for a phase
    pub fn for_phase(&self, phase: Phase) -> &PhaseWeights {
        match phase {
            Phase::Approach => &self.approach,
            Phase::Regroup => &self.regroup,
            Phase::Attack => &self.attack,
        }
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

// ============================================================================
// SIGNALS
// ============================================================================

/// Raw evaluation terms for one viewer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signals {
    /// Viewer marbles on board minus opponent marbles on board
    pub material: f32,
    /// Mean distance of the viewer's marbles to the center (lower is better)
    pub centrality: f32,
    /// 1 - normalized mean pairwise distance of the viewer's marbles
    pub cohesion: f32,
    /// Same measure for the opponent's marbles
    pub opponent_cohesion: f32,
    /// Fraction of the viewer's starting marbles still on the board
    pub progress: f32,
}

impl Signals {
    /// Phase selected by the decision tree
    pub fn phase(&self, thresholds: &PhaseThresholds) -> Phase {
        if self.centrality > thresholds.centrality {
            Phase::Approach
        } else if self.cohesion < thresholds.cohesion {
            Phase::Regroup
        } else {
            Phase::Attack
        }
    }

    /// Weighted combination
    pub fn combine(&self, w: &PhaseWeights) -> Score {
        w.material * self.material - w.centrality * self.centrality + w.cohesion * self.cohesion
            - w.opponent_cohesion * self.opponent_cohesion
            + w.progress * self.progress
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Abalone evaluator over a shared distance table
#[derive(Clone, Debug)]
pub struct Evaluator {
    oracle: &'static DistanceOracle,
    weights: Weights,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DistanceOracle::global(), Weights::default())
    }
}

impl Evaluator {
    pub fn new(oracle: &'static DistanceOracle, weights: Weights) -> Self {
        Self { oracle, weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Compute the raw signals for `viewer`
    pub fn signals(&self, position: &Position, viewer: Player, opponent: Player) -> Signals {
        let mine: Vec<Cell> = position.pieces(viewer).collect();
        let theirs: Vec<Cell> = position.pieces(opponent).collect();

        Signals {
            material: mine.len() as f32 - theirs.len() as f32,
            centrality: self.centrality(&mine),
            cohesion: self.cohesion(&mine),
            opponent_cohesion: self.cohesion(&theirs),
            progress: mine.len() as f32 / MARBLES_PER_PLAYER as f32,
        }
    }

    /// Mean distance to the center; 0 with no pieces
    fn centrality(&self, pieces: &[Cell]) -> f32 {
        if pieces.is_empty() {
            return 0.0;
        }
        let total: u32 = pieces
            .iter()
            .map(|&c| self.oracle.distance(c, CENTER) as u32)
            .sum();
        total as f32 / pieces.len() as f32
    }

    /// 1 - mean pairwise distance / max distance; 0 with fewer than two pieces
    fn cohesion(&self, pieces: &[Cell]) -> f32 {
        if pieces.len() < 2 {
            return 0.0;
        }
        let mut total = 0u32;
        let mut pairs = 0u32;
        for (i, &a) in pieces.iter().enumerate() {
            for &b in &pieces[i + 1..] {
                total += self.oracle.distance(a, b) as u32;
                pairs += 1;
            }
        }
        let mean = total as f32 / pairs as f32;
        1.0 - mean / MAX_DISTANCE as f32
    }
}

impl Evaluate<Abalone> for Evaluator {
    fn evaluate(&self, position: &Position, viewer: Player, opponent: Player) -> Score {
        let signals = self.signals(position, viewer, opponent);
        let phase = signals.phase(&self.weights.thresholds);
        let mut score = signals.combine(self.weights.for_phase(phase));

        match position.result() {
            GameResult::Ongoing | GameResult::Draw => {}
            result if result.winner() == Some(viewer) => score += WIN_VALUE,
            _ => score -= WIN_VALUE,
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: u8, y: u8) -> Cell {
        Cell::new(x, y).unwrap()
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let eval = Evaluator::default();
        let pos = Position::initial();
        let black = eval.evaluate(&pos, Player::Black, Player::White);
        let white = eval.evaluate(&pos, Player::White, Player::Black);
        assert!((black - white).abs() < 1e-4, "{} vs {}", black, white);
    }

    #[test]
    fn test_single_piece_signals_are_finite() {
        let eval = Evaluator::default();
        let pos = Position::from_cells(&[CENTER], &[cell(10, 4)], Player::Black);

        let s = eval.signals(&pos, Player::Black, Player::White);
        assert_eq!(s.material, 0.0);
        assert_eq!(s.centrality, 0.0);
        assert_eq!(s.cohesion, 0.0);
        assert_eq!(s.opponent_cohesion, 0.0);
        assert!(s.progress.is_finite());

        let score = eval.evaluate(&pos, Player::Black, Player::White);
        assert!(score.is_finite());
        let other = eval.evaluate(&pos, Player::White, Player::Black);
        assert!(other.is_finite());
    }

    #[test]
    fn test_empty_side_uses_zero_signals() {
        let eval = Evaluator::default();
        let pos = Position::from_cells(&[CENTER], &[], Player::White);
        let s = eval.signals(&pos, Player::White, Player::Black);
        assert_eq!(s.centrality, 0.0);
        assert_eq!(s.cohesion, 0.0);
        assert_eq!(s.progress, 0.0);
        assert_eq!(s.material, -1.0);
    }

    #[test]
    fn test_material_counts_marbles_on_board() {
        let eval = Evaluator::default();
        let pos = Position::from_cells(
            &[cell(8, 4), cell(10, 4), cell(12, 4)],
            &[cell(0, 4)],
            Player::Black,
        );
        let s = eval.signals(&pos, Player::Black, Player::White);
        assert_eq!(s.material, 2.0);
        assert!((s.progress - 3.0 / 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_cohesion_prefers_compact_groups() {
        let eval = Evaluator::default();
        let compact = Position::from_cells(&[cell(8, 4), cell(10, 4)], &[], Player::Black);
        let spread = Position::from_cells(&[cell(0, 4), cell(16, 4)], &[], Player::Black);
        let c = eval.signals(&compact, Player::Black, Player::White).cohesion;
        let s = eval.signals(&spread, Player::Black, Player::White).cohesion;
        assert!((c - (1.0 - 1.0 / 8.0)).abs() < 1e-6);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_phase_selection() {
        let t = Weights::default().thresholds;
        let base = Signals {
            material: 0.0,
            centrality: 3.0,
            cohesion: 0.9,
            opponent_cohesion: 0.0,
            progress: 1.0,
        };
        assert_eq!(base.phase(&t), Phase::Approach);
        let regroup = Signals {
            centrality: 1.0,
            cohesion: 0.2,
            ..base
        };
        assert_eq!(regroup.phase(&t), Phase::Regroup);
        let attack = Signals {
            centrality: 1.0,
            ..base
        };
        assert_eq!(attack.phase(&t), Phase::Attack);
    }

    #[test]
    fn test_combine_formula() {
        let s = Signals {
            material: 2.0,
            centrality: 1.0,
            cohesion: 0.5,
            opponent_cohesion: 0.25,
            progress: 1.0,
        };
        let w = PhaseWeights {
            material: 1.0,
            centrality: 2.0,
            cohesion: 4.0,
            opponent_cohesion: 4.0,
            progress: 3.0,
        };
        assert_eq!(s.combine(&w), 2.0 - 2.0 + 2.0 - 1.0 + 3.0);
    }

    #[test]
    fn test_decided_game_dominates() {
        let eval = Evaluator::default();
        let pos = Position::initial().with_lost(6, 0);
        let white = eval.evaluate(&pos, Player::White, Player::Black);
        let black = eval.evaluate(&pos, Player::Black, Player::White);
        assert!(white > WIN_VALUE / 2.0);
        assert!(black < -WIN_VALUE / 2.0);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let eval = Evaluator::default();
        let pos = Position::initial();
        let mv = pos.legal_moves()[3];
        let next = pos.apply_move(mv);
        let a = eval.evaluate(&next, Player::Black, Player::White);
        let b = eval.evaluate(&next, Player::Black, Player::White);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_weights_json_round_trip() {
        let w = Weights::default();
        let json = serde_json::to_string(&w).unwrap();
        let back: Weights = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
