//! Abalone game state and move generation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, Direction};
use crate::rules::GameRules;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Marbles per player at the start
pub const MARBLES_PER_PLAYER: u8 = 14;

/// Marbles a player must push off to win
pub const MARBLES_TO_WIN: u8 = 6;

/// Default ply limit before the game is decided on captures
pub const DEFAULT_MAX_PLIES: u16 = 50;

/// Longest line of own marbles that may move together
const MAX_GROUP: u8 = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black = 0,
    White = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    Draw,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::BlackWins => Some(Player::Black),
            GameResult::WhiteWins => Some(Player::White),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }
}

/// A legal move: a line of `count` marbles starting at `tail` and
/// extending along `axis`, all stepping one cell in `dir`.
///
/// Inline moves have `axis == dir`; `tail` is then the rearmost marble.
/// Broadside moves step sideways (`dir` not parallel to `axis`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub tail: Cell,
    pub count: u8,
    pub axis: Direction,
    pub dir: Direction,
}

impl Move {
    pub fn inline(tail: Cell, count: u8, dir: Direction) -> Self {
        Self {
            tail,
            count,
            axis: dir,
            dir,
        }
    }

    pub fn broadside(tail: Cell, count: u8, axis: Direction, dir: Direction) -> Self {
        Self {
            tail,
            count,
            axis,
            dir,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.axis == self.dir
    }

    /// Cells of the moving group, tail first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        std::iter::successors(Some(self.tail), move |c| c.neighbor(self.axis))
            .take(self.count as usize)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inline() {
            write!(f, "{} x{} {:?}", self.tail, self.count, self.dir)
        } else {
            write!(f, "{} x{} along {:?} {:?}", self.tail, self.count, self.axis, self.dir)
        }
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Immutable game position.
///
/// Equality and hashing cover the whole value, including the ply counter,
/// because the ply horizon decides terminal status.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Occupancy bitboards, indexed by `Player::index`
    occupancy: [u64; 2],

    to_move: Player,

    /// Marbles each player has lost off the board
    lost: [u8; 2],

    /// Plies played so far
    pub ply: u16,

    /// Ply count at which the game ends on captures
    pub max_plies: u16,
}

impl Position {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening layout, Black to move
    pub fn initial() -> Self {
        let mut black = Vec::with_capacity(MARBLES_PER_PLAYER as usize);
        let mut white = Vec::with_capacity(MARBLES_PER_PLAYER as usize);
        for cell in Cell::all() {
            match cell.y() {
                0 | 1 => black.push(cell),
                2 if (6..=10).contains(&cell.x()) => black.push(cell),
                7 | 8 => white.push(cell),
                6 if (6..=10).contains(&cell.x()) => white.push(cell),
                _ => {}
            }
        }
        Self::from_cells(&black, &white, Player::Black)
    }

    /// Position with the given marbles and no losses recorded. A cell
    /// listed for both players stays black.
    pub fn from_cells(black: &[Cell], white: &[Cell], to_move: Player) -> Self {
        Self {
            occupancy: [mask_of(black), mask_of(white) & !mask_of(black)],
            to_move,
            lost: [0, 0],
            ply: 0,
            max_plies: DEFAULT_MAX_PLIES,
        }
    }

    /// Set how many marbles each player has already lost
    pub fn with_lost(mut self, black: u8, white: u8) -> Self {
        self.lost = [black, white];
        self
    }

    pub fn with_max_plies(mut self, max_plies: u16) -> Self {
        self.max_plies = max_plies;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.to_move
    }

    pub fn owner(&self, cell: Cell) -> Option<Player> {
        if self.occupancy[0] & cell.bit() != 0 {
            Some(Player::Black)
        } else if self.occupancy[1] & cell.bit() != 0 {
            Some(Player::White)
        } else {
            None
        }
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        (self.occupancy[0] | self.occupancy[1]) & cell.bit() == 0
    }

    /// Cells holding `player`'s marbles
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Cell> {
        let mut bits = self.occupancy[player.index()];
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Cell::from_index(index)
        })
    }

    pub fn piece_count(&self, player: Player) -> u8 {
        self.occupancy[player.index()].count_ones() as u8
    }

    /// Marbles `player` has lost
    pub fn lost(&self, player: Player) -> u8 {
        self.lost[player.index()]
    }

    /// Marbles `player` has pushed off
    pub fn captures(&self, player: Player) -> u8 {
        self.lost[player.opponent().index()]
    }

    pub fn result(&self) -> GameResult {
        if self.lost[Player::Black.index()] >= MARBLES_TO_WIN {
            return GameResult::WhiteWins;
        }
        if self.lost[Player::White.index()] >= MARBLES_TO_WIN {
            return GameResult::BlackWins;
        }
        if self.ply >= self.max_plies {
            let black = self.captures(Player::Black);
            let white = self.captures(Player::White);
            return match black.cmp(&white) {
                std::cmp::Ordering::Greater => GameResult::BlackWins,
                std::cmp::Ordering::Less => GameResult::WhiteWins,
                std::cmp::Ordering::Equal => GameResult::Draw,
            };
        }
        GameResult::Ongoing
    }

    pub fn is_terminal(&self) -> bool {
        self.result() != GameResult::Ongoing
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves for the side to move (empty once the game is over)
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        if self.is_terminal() {
            return moves;
        }
        let me = self.to_move;
        for tail in self.pieces(me) {
            self.generate_inline(tail, &mut moves);
            self.generate_broadside(tail, &mut moves);
        }
        moves
    }

    fn generate_inline(&self, tail: Cell, moves: &mut Vec<Move>) {
        let me = self.to_move;
        for dir in Direction::ALL {
            let mut lead = tail;
            for count in 1..=MAX_GROUP {
                if count > 1 {
                    match lead.neighbor(dir) {
                        Some(next) if self.owner(next) == Some(me) => lead = next,
                        _ => break,
                    }
                }
                let Some(target) = lead.neighbor(dir) else {
                    break;
                };
                match self.owner(target) {
                    None => moves.push(Move::inline(tail, count, dir)),
                    Some(p) if p == me => continue,
                    Some(_) => {
                        if self.can_push(target, count, dir) {
                            moves.push(Move::inline(tail, count, dir));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Whether a line of `count` own marbles can push the opposing line
    /// starting at `first`
    fn can_push(&self, first: Cell, count: u8, dir: Direction) -> bool {
        let opponent = self.to_move.opponent();
        let mut run = 0;
        let mut cursor = Some(first);
        while let Some(cell) = cursor {
            if self.owner(cell) != Some(opponent) {
                break;
            }
            run += 1;
            if run >= count {
                return false;
            }
            cursor = cell.neighbor(dir);
        }
        // Beyond the run: off the board (capture) or an empty cell
        match cursor {
            None => true,
            Some(cell) => self.is_empty(cell),
        }
    }

    fn generate_broadside(&self, tail: Cell, moves: &mut Vec<Move>) {
        let me = self.to_move;
        for axis in Direction::AXES {
            let mut group = vec![tail];
            for count in 2..=MAX_GROUP {
                match group[group.len() - 1].neighbor(axis) {
                    Some(next) if self.owner(next) == Some(me) => group.push(next),
                    _ => break,
                }
                for dir in Direction::ALL {
                    if dir.is_parallel(axis) {
                        continue;
                    }
                    let clear = group
                        .iter()
                        .all(|c| c.neighbor(dir).is_some_and(|d| self.is_empty(d)));
                    if clear {
                        moves.push(Move::broadside(tail, count, axis, dir));
                    }
                }
            }
        }
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Apply a legal move and return the successor position
    pub fn apply_move(&self, mv: Move) -> Position {
        let me = self.to_move.index();
        let them = self.to_move.opponent().index();
        let mut next = self.clone();

        let group: Vec<Cell> = mv.cells().collect();
        let mut shifted = 0u64;
        for cell in &group {
            next.occupancy[me] &= !cell.bit();
            if let Some(dest) = cell.neighbor(mv.dir) {
                shifted |= dest.bit();
            }
        }

        if mv.is_inline() {
            // Push any opposing run ahead of the lead marble
            let mut cursor = group.last().and_then(|lead| lead.neighbor(mv.dir));
            let mut pushed = 0u64;
            while let Some(cell) = cursor {
                if self.occupancy[them] & cell.bit() == 0 {
                    break;
                }
                next.occupancy[them] &= !cell.bit();
                match cell.neighbor(mv.dir) {
                    Some(dest) => pushed |= dest.bit(),
                    None => next.lost[them] += 1,
                }
                cursor = cell.neighbor(mv.dir);
            }
            next.occupancy[them] |= pushed;
        }

        next.occupancy[me] |= shifted;
        next.to_move = self.to_move.opponent();
        next.ply += 1;
        next
    }
}

fn mask_of(cells: &[Cell]) -> u64 {
    cells.iter().fold(0, |mask, c| mask | c.bit())
}

// ============================================================================
// RULES
// ============================================================================

/// Abalone rules as a search capability
#[derive(Clone, Copy, Debug, Default)]
pub struct Abalone;

impl GameRules for Abalone {
    type Position = Position;
    type Move = Move;
    type Player = Player;

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        position.legal_moves()
    }

    fn apply(&self, position: &Position, mv: Move) -> Position {
        position.apply_move(mv)
    }

    fn is_terminal(&self, position: &Position) -> bool {
        position.is_terminal()
    }

    fn score(&self, position: &Position, player: Player) -> i32 {
        position.captures(player) as i32
    }

    fn to_move(&self, position: &Position) -> Player {
        position.current_player()
    }

    fn opponent(&self, player: Player) -> Player {
        player.opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: u8, y: u8) -> Cell {
        Cell::new(x, y).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let pos = Position::initial();
        assert_eq!(pos.piece_count(Player::Black), 14);
        assert_eq!(pos.piece_count(Player::White), 14);
        assert_eq!(pos.lost(Player::Black), 0);
        assert_eq!(pos.current_player(), Player::Black);
        assert_eq!(pos.owner(cell(8, 2)), Some(Player::Black));
        assert_eq!(pos.owner(cell(8, 6)), Some(Player::White));
        assert_eq!(pos.owner(cell(8, 4)), None);
        assert_eq!(pos.result(), GameResult::Ongoing);
    }

    #[test]
    fn test_initial_move_count() {
        // Standard Abalone opening has 44 legal moves
        assert_eq!(Position::initial().legal_moves().len(), 44);
    }

    #[test]
    fn test_single_marble_moves() {
        let pos = Position::from_cells(&[cell(8, 4)], &[cell(0, 4)], Player::Black);
        let moves = pos.legal_moves();
        assert_eq!(moves.len(), 6);
        assert!(moves.iter().all(|m| m.count == 1 && m.is_inline()));
    }

    #[test]
    fn test_cannot_move_off_board() {
        let pos = Position::from_cells(&[cell(4, 0)], &[cell(8, 4)], Player::Black);
        // Corner cell has 3 on-board neighbours
        assert_eq!(pos.legal_moves().len(), 3);
    }

    #[test]
    fn test_sumito_push_off_board() {
        // Black line (10,4),(12,4) pushes white (14,4) east; (16,4) empty then edge
        let black = [cell(10, 4), cell(12, 4)];
        let white = [cell(14, 4), cell(16, 4)];
        let pos = Position::from_cells(&black, &white, Player::Black);
        // 2 vs 2 is not a legal push
        let east = Move::inline(cell(10, 4), 2, Direction::E);
        assert!(!pos.legal_moves().contains(&east));

        let black = [cell(8, 4), cell(10, 4), cell(12, 4)];
        let pos = Position::from_cells(&black, &white, Player::Black);
        let east = Move::inline(cell(8, 4), 3, Direction::E);
        assert!(pos.legal_moves().contains(&east));

        let next = pos.apply_move(east);
        assert_eq!(next.lost(Player::White), 1);
        assert_eq!(next.captures(Player::Black), 1);
        assert_eq!(next.owner(cell(16, 4)), Some(Player::White));
        assert_eq!(next.owner(cell(14, 4)), Some(Player::Black));
        assert_eq!(next.owner(cell(8, 4)), None);
        assert_eq!(next.current_player(), Player::White);
        assert_eq!(next.ply, 1);
    }

    #[test]
    fn test_push_blocked_by_own_marble_behind() {
        let black = [cell(8, 4), cell(10, 4), cell(14, 4)];
        let white = [cell(12, 4)];
        let pos = Position::from_cells(&black, &white, Player::Black);
        let east = Move::inline(cell(8, 4), 2, Direction::E);
        assert!(!pos.legal_moves().contains(&east));
    }

    #[test]
    fn test_broadside_move() {
        let black = [cell(6, 4), cell(8, 4)];
        let pos = Position::from_cells(&black, &[cell(0, 4)], Player::Black);
        let mv = Move::broadside(cell(6, 4), 2, Direction::E, Direction::SE);
        assert!(pos.legal_moves().contains(&mv));
        let next = pos.apply_move(mv);
        assert_eq!(next.owner(cell(7, 5)), Some(Player::Black));
        assert_eq!(next.owner(cell(9, 5)), Some(Player::Black));
        assert!(next.is_empty(cell(6, 4)));
        assert!(next.is_empty(cell(8, 4)));
    }

    #[test]
    fn test_moves_preserve_marble_count() {
        let pos = Position::initial();
        for mv in pos.legal_moves() {
            let next = pos.apply_move(mv);
            assert_eq!(next.piece_count(Player::Black), 14);
            assert_eq!(next.piece_count(Player::White), 14);
        }
    }

    #[test]
    fn test_ply_limit_decides_on_captures() {
        let black = [cell(8, 4), cell(10, 4)];
        let white = [cell(0, 4)];
        let pos = Position::from_cells(&black, &white, Player::Black)
            .with_lost(0, 1)
            .with_max_plies(0);
        assert_eq!(pos.result(), GameResult::BlackWins);
        assert!(pos.legal_moves().is_empty());

        let even = Position::initial().with_max_plies(0);
        assert_eq!(even.result(), GameResult::Draw);
    }

    #[test]
    fn test_six_losses_end_the_game() {
        let black: Vec<Cell> = Cell::all().filter(|c| c.y() == 0).collect();
        let white: Vec<Cell> = Cell::all().filter(|c| c.y() == 8).collect();
        let pos = Position::from_cells(&black, &white, Player::Black).with_lost(5, 2);
        assert!(!pos.is_terminal());

        let pos = pos.with_lost(6, 2);
        assert!(pos.is_terminal());
        assert_eq!(pos.result(), GameResult::WhiteWins);
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::inline(cell(8, 4), 3, Direction::E).to_string(), "(8, 4) x3 E");
        assert_eq!(
            Move::broadside(cell(6, 4), 2, Direction::E, Direction::SE).to_string(),
            "(6, 4) x2 along E SE"
        );
    }

    #[test]
    fn test_position_identity() {
        let a = Position::initial();
        let mv = a.legal_moves()[0];
        let b = a.apply_move(mv);
        assert_ne!(a, b);
        assert_eq!(b, a.apply_move(mv));
    }
}
