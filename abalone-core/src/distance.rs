//! Precomputed shortest-path distances between board cells
//!
//! The table is built once by breadth-first search over the hex adjacency
//! graph (or loaded from a persisted table) and is read-only afterwards.
//! Coverage is checked at construction, so lookups never fail.

use std::collections::VecDeque;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::board::{Cell, NUM_CELLS};
use crate::error::{CoreError, Result};

const UNSET: u8 = u8::MAX;

static GLOBAL: Lazy<DistanceOracle> = Lazy::new(|| {
    DistanceOracle::build().unwrap_or_else(|e| panic!("board graph is disconnected: {}", e))
});

/// One persisted table row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub a: Cell,
    pub b: Cell,
    pub distance: u8,
}

/// Dense all-pairs distance table
#[derive(Clone, Debug)]
pub struct DistanceOracle {
    table: Vec<u8>,
}

impl DistanceOracle {
    /// Process-wide shared instance, built on first use
    pub fn global() -> &'static DistanceOracle {
        &GLOBAL
    }

    /// Build the table by BFS from every cell
    pub fn build() -> Result<Self> {
        let mut table = vec![UNSET; NUM_CELLS * NUM_CELLS];
        for start in Cell::all() {
            bfs_from(start, &mut table[start.index() * NUM_CELLS..][..NUM_CELLS]);
        }
        let oracle = Self { table };
        oracle.check_coverage(|a, b| CoreError::UnreachablePair { a, b })?;
        Ok(oracle)
    }

    /// Build from a precomputed table. Every ordered pair of distinct cells
    /// must be covered by an entry in either direction.
    pub fn from_entries(entries: &[DistanceEntry]) -> Result<Self> {
        let mut table = vec![UNSET; NUM_CELLS * NUM_CELLS];
        for cell in Cell::all() {
            table[slot(cell, cell)] = 0;
        }
        for entry in entries {
            if entry.a == entry.b {
                continue;
            }
            for (a, b) in [(entry.a, entry.b), (entry.b, entry.a)] {
                let existing = table[slot(a, b)];
                if existing != UNSET && existing != entry.distance {
                    return Err(CoreError::AsymmetricDistance {
                        a,
                        b,
                        forward: existing,
                        backward: entry.distance,
                    });
                }
                table[slot(a, b)] = entry.distance;
            }
        }
        let oracle = Self { table };
        oracle.check_coverage(|a, b| CoreError::MissingDistance { a, b })?;
        Ok(oracle)
    }

    /// Load a JSON table written by [`DistanceOracle::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<DistanceEntry> = serde_json::from_str(&content)?;
        Self::from_entries(&entries)
    }

    /// Write the table as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(&self.to_entries())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Export every unordered pair (a < b)
    pub fn to_entries(&self) -> Vec<DistanceEntry> {
        let mut entries = Vec::with_capacity(NUM_CELLS * (NUM_CELLS - 1) / 2);
        for a in Cell::all() {
            for b in Cell::all().filter(|b| *b > a) {
                entries.push(DistanceEntry {
                    a,
                    b,
                    distance: self.distance(a, b),
                });
            }
        }
        entries
    }

    /// Graph distance between two cells
    #[inline]
    pub fn distance(&self, a: Cell, b: Cell) -> u8 {
        self.table[slot(a, b)]
    }

    fn check_coverage(&self, missing: impl Fn(Cell, Cell) -> CoreError) -> Result<()> {
        for a in Cell::all() {
            for b in Cell::all() {
                if self.table[slot(a, b)] == UNSET {
                    return Err(missing(a, b));
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn slot(a: Cell, b: Cell) -> usize {
    a.index() * NUM_CELLS + b.index()
}

fn bfs_from(start: Cell, row: &mut [u8]) {
    let mut queue = VecDeque::new();
    row[start.index()] = 0;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let steps = row[current.index()];
        for next in current.neighbors() {
            if row[next.index()] == UNSET {
                row[next.index()] = steps + 1;
                queue.push_back(next);
            }
        }
    }
}
