//! Sparse, unbounded occupancy grid.

use crate::cell::Cell;
use sporegrid_core::{Error, Position, Result};
use std::collections::BTreeMap;

/// Sparse x -> (y -> Cell) index. No wraparound, no bounds; at most one cell
/// per coordinate.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: BTreeMap<i32, BTreeMap<i32, Cell>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(&pos.x).and_then(|row| row.get(&pos.y))
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.rows.get_mut(&pos.x).and_then(|row| row.get_mut(&pos.y))
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Energy of the cell at `pos`, zero when the slot is empty
    pub fn energy_at(&self, pos: Position) -> f64 {
        self.get(pos).map_or(0.0, |cell| cell.energy)
    }

    /// Insert a cell at its own position, refusing occupied slots
    pub fn insert(&mut self, cell: Cell) -> Result<()> {
        let pos = cell.position();
        let row = self.rows.entry(pos.x).or_default();
        if row.contains_key(&pos.y) {
            return Err(Error::Occupied(pos));
        }
        row.insert(pos.y, cell);
        Ok(())
    }

    /// Remove the cell at `pos`, pruning its row once empty
    pub fn remove(&mut self, pos: Position) -> Option<Cell> {
        let row = self.rows.get_mut(&pos.x)?;
        let cell = row.remove(&pos.y);
        if row.is_empty() {
            self.rows.remove(&pos.x);
        }
        cell
    }

    /// Stable snapshot of every occupied position
    pub fn positions(&self) -> Vec<Position> {
        self.iter().map(|cell| cell.position()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.values().flat_map(|row| row.values())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> + '_ {
        self.rows.values_mut().flat_map(|row| row.values_mut())
    }
}
