//! The game-engine capability consumed by evaluation and search

use std::fmt::Debug;
use std::hash::Hash;

/// Rules of a two-player, zero-sum, perfect-information game.
///
/// Search code only ever sees positions through this trait: it enumerates
/// moves, applies them to get successor positions, and reads terminal
/// status and per-player scores. Implementations are trusted to return
/// only legal moves; nothing downstream re-validates them.
pub trait GameRules {
    /// Immutable snapshot; equality and hash define cache identity
    type Position: Clone + Eq + Hash + Debug;
    type Move: Copy + Eq + Debug;
    type Player: Copy + Eq + Debug;

    fn legal_moves(&self, position: &Self::Position) -> Vec<Self::Move>;

    fn apply(&self, position: &Self::Position, mv: Self::Move) -> Self::Position;

    fn is_terminal(&self, position: &Self::Position) -> bool;

    /// Game score of `player` (higher is better for that player)
    fn score(&self, position: &Self::Position, player: Self::Player) -> i32;

    fn to_move(&self, position: &Self::Position) -> Self::Player;

    fn opponent(&self, player: Self::Player) -> Self::Player;
}
