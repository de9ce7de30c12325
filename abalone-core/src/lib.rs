//! Abalone Core - Game engine and AI
//!
//! This crate provides the core game logic and search for Abalone:
//! - Board geometry (hex grid with doubled-width coordinates)
//! - Precomputed cell-to-cell distances
//! - Game state and move generation
//! - Position evaluation with phase-dependent heuristics
//! - Move ordering and a depth-keyed transposition cache
//! - Alpha-beta search driven by iterative deepening under a time budget

pub mod board;
pub mod distance;
pub mod error;
pub mod rules;
pub mod game;
pub mod eval;
pub mod ordering;
pub mod tt;
pub mod ai;

// Re-exports for convenient access
pub use board::{Cell, Direction, CENTER, NUM_CELLS};
pub use distance::{DistanceEntry, DistanceOracle};
pub use error::CoreError;
pub use rules::GameRules;
pub use game::{Abalone, GameResult, Move, Player, Position};
pub use eval::{Evaluate, Evaluator, Phase, Score, Weights, SCORE_MAX, SCORE_MIN, WIN_VALUE};
pub use ordering::MoveOrderer;
pub use tt::{TranspositionCache, TranspositionKey};
pub use ai::{minimax, AlphaBetaAI, SearchBudget, SearchConfig, SearchResult, SearchStats};
