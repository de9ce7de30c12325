//! Move ordering for alpha-beta
//!
//! Ordering never changes the value search returns, only how early the
//! cutoffs arrive.

use crate::rules::GameRules;

/// Ranks candidate moves by the score differential of their one-ply
/// successor, best first for the side choosing.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveOrderer;

impl MoveOrderer {
    /// Sort `moves` best first for `viewer`. Ties keep no particular order.
    pub fn order<R: GameRules>(
        &self,
        rules: &R,
        moves: Vec<R::Move>,
        position: &R::Position,
        viewer: R::Player,
    ) -> Vec<R::Move> {
        let opponent = rules.opponent(viewer);
        let mut keyed: Vec<(i32, R::Move)> = moves
            .into_iter()
            .map(|mv| {
                let child = rules.apply(position, mv);
                let key = rules.score(&child, viewer) - rules.score(&child, opponent);
                (key, mv)
            })
            .collect();
        keyed.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        keyed.into_iter().map(|(_, mv)| mv).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Direction};
    use crate::game::{Abalone, Move, Player, Position};

    fn cell(x: u8, y: u8) -> Cell {
        Cell::new(x, y).unwrap()
    }

    #[test]
    fn test_capture_sorted_first() {
        let black = [cell(8, 4), cell(10, 4), cell(12, 4)];
        let white = [cell(14, 4), cell(16, 4)];
        let pos = Position::from_cells(&black, &white, Player::Black);
        let moves = pos.legal_moves();
        let ordered = MoveOrderer.order(&Abalone, moves.clone(), &pos, Player::Black);

        assert_eq!(ordered.len(), moves.len());
        assert_eq!(ordered[0], Move::inline(cell(8, 4), 3, Direction::E));
    }

    #[test]
    fn test_order_is_a_permutation() {
        let pos = Position::initial();
        let moves = pos.legal_moves();
        let mut ordered = MoveOrderer.order(&Abalone, moves.clone(), &pos, Player::Black);
        let mut original = moves;
        let key = |m: &Move| (m.tail, m.count, m.axis as u8, m.dir as u8);
        ordered.sort_by_key(key);
        original.sort_by_key(key);
        assert_eq!(ordered, original);
    }
}
