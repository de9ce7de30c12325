//! Hex board geometry with doubled-width coordinates
//!
//! Rows run `y = 0..=8`. Row `y` holds `9 - |y - 4|` cells at
//! `x = |y - 4|, |y - 4| + 2, ..., 16 - |y - 4|`, so horizontal neighbours
//! differ by 2 in `x` and diagonal neighbours by 1 in each axis.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Number of cells on the board
pub const NUM_CELLS: usize = 61;

/// Number of rows
pub const NUM_ROWS: u8 = 9;

/// Largest graph distance from the center to any cell
pub const MAX_CENTER_DISTANCE: u8 = 4;

/// Largest graph distance between any two cells
pub const MAX_DISTANCE: u8 = 8;

/// Center of the board in (x, y)
pub const CENTER: Cell = match Cell::new(8, 4) {
    Some(c) => c,
    None => panic!("center must be on the board"),
};

// ============================================================================
// CELL
// ============================================================================

/// A validated board coordinate.
///
/// Stored as a dense index in `0..NUM_CELLS`, which doubles as the bit
/// position in occupancy bitboards and the row/column in distance tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Cell {
    index: u8,
}

/// (x, y) for every cell, in index order
const CELL_COORDS: [(u8, u8); NUM_CELLS] = build_coords();

const fn row_offset(y: u8) -> u8 {
    if y >= 4 {
        y - 4
    } else {
        4 - y
    }
}

const fn row_len(y: u8) -> u8 {
    NUM_ROWS - row_offset(y)
}

const fn row_start(y: u8) -> u8 {
    let mut start = 0;
    let mut row = 0;
    while row < y {
        start += row_len(row);
        row += 1;
    }
    start
}

const fn build_coords() -> [(u8, u8); NUM_CELLS] {
    let mut coords = [(0u8, 0u8); NUM_CELLS];
    let mut i = 0;
    let mut y = 0;
    while y < NUM_ROWS {
        let offset = row_offset(y);
        let mut k = 0;
        while k < row_len(y) {
            coords[i] = (offset + 2 * k, y);
            i += 1;
            k += 1;
        }
        y += 1;
    }
    coords
}

impl Cell {
    /// Cell at (x, y), or `None` if the coordinate is off the board
    pub const fn new(x: u8, y: u8) -> Option<Self> {
        if y >= NUM_ROWS {
            return None;
        }
        let offset = row_offset(y);
        if x < offset || x > 16 - offset || (x - offset) % 2 != 0 {
            return None;
        }
        Some(Self {
            index: row_start(y) + (x - offset) / 2,
        })
    }

    /// Cell from its dense index
    pub fn from_index(index: usize) -> Option<Self> {
        (index < NUM_CELLS).then_some(Self { index: index as u8 })
    }

    pub const fn index(self) -> usize {
        self.index as usize
    }

    pub const fn x(self) -> u8 {
        CELL_COORDS[self.index as usize].0
    }

    pub const fn y(self) -> u8 {
        CELL_COORDS[self.index as usize].1
    }

    /// Bitboard mask with only this cell set
    pub const fn bit(self) -> u64 {
        1u64 << self.index
    }

    /// Adjacent cell in `dir`, if on the board
    pub fn neighbor(self, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let x = self.x() as i8 + dx;
        let y = self.y() as i8 + dy;
        if x < 0 || y < 0 {
            return None;
        }
        Cell::new(x as u8, y as u8)
    }

    /// All on-board neighbours
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        Direction::ALL.into_iter().filter_map(move |d| self.neighbor(d))
    }

    /// Iterate every cell on the board in index order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..NUM_CELLS as u8).map(|index| Cell { index })
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl TryFrom<(u8, u8)> for Cell {
    type Error = CoreError;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Cell::new(x, y).ok_or(CoreError::InvalidCell { x, y })
    }
}

impl From<Cell> for (u8, u8) {
    fn from(cell: Cell) -> Self {
        (cell.x(), cell.y())
    }
}

// ============================================================================
// DIRECTIONS
// ============================================================================

/// The six hex directions, clockwise from east
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    E,
    SE,
    SW,
    W,
    NW,
    NE,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::E,
        Direction::SE,
        Direction::SW,
        Direction::W,
        Direction::NW,
        Direction::NE,
    ];

    /// One representative per line axis, used to enumerate groups once
    pub const AXES: [Direction; 3] = [Direction::E, Direction::SE, Direction::SW];

    /// Coordinate delta (dx, dy)
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::E => (2, 0),
            Direction::SE => (1, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-2, 0),
            Direction::NW => (-1, -1),
            Direction::NE => (1, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::E => Direction::W,
            Direction::SE => Direction::NW,
            Direction::SW => Direction::NE,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
            Direction::NE => Direction::SW,
        }
    }

    /// True if both directions lie on the same line axis
    pub fn is_parallel(self, other: Direction) -> bool {
        self == other || self == other.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count_and_rows() {
        assert_eq!(Cell::all().count(), NUM_CELLS);
        let row_sizes: Vec<usize> = (0..NUM_ROWS)
            .map(|y| Cell::all().filter(|c| c.y() == y).count())
            .collect();
        assert_eq!(row_sizes, vec![5, 6, 7, 8, 9, 8, 7, 6, 5]);
    }

    #[test]
    fn test_cell_validity() {
        assert!(Cell::new(8, 4).is_some());
        assert!(Cell::new(4, 0).is_some());
        assert!(Cell::new(12, 0).is_some());
        assert!(Cell::new(0, 4).is_some());
        assert!(Cell::new(16, 4).is_some());
        assert!(Cell::new(5, 0).is_none()); // wrong parity
        assert!(Cell::new(2, 0).is_none()); // left of row 0
        assert!(Cell::new(14, 0).is_none()); // right of row 0
        assert!(Cell::new(8, 9).is_none());
    }

    #[test]
    fn test_index_round_trip() {
        for (i, cell) in Cell::all().enumerate() {
            assert_eq!(cell.index(), i);
            assert_eq!(Cell::new(cell.x(), cell.y()), Some(cell));
        }
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(CENTER.neighbors().count(), 6);
        let corner = Cell::new(4, 0).unwrap();
        assert_eq!(corner.neighbors().count(), 3);
        assert_eq!(CENTER.neighbor(Direction::E), Cell::new(10, 4));
        assert_eq!(CENTER.neighbor(Direction::NW), Cell::new(7, 3));
        assert_eq!(corner.neighbor(Direction::NE), None);
    }

    #[test]
    fn test_direction_opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (dx, dy) = d.delta();
            let (ox, oy) = d.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert!(d.is_parallel(d.opposite()));
        }
        assert!(!Direction::E.is_parallel(Direction::SE));
    }

    #[test]
    fn test_cell_serde_as_pair() {
        let json = serde_json::to_string(&CENTER).unwrap();
        assert_eq!(json, "[8,4]");
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CENTER);
        assert!(serde_json::from_str::<Cell>("[5,0]").is_err());
    }
}
