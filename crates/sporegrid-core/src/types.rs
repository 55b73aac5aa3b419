//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub Uuid);

impl CellId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position on the unbounded grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset position, or `None` when it falls outside the `i32` range
    pub fn checked_add(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Neighbouring position in the given diagonal direction; `None` past
    /// the edge of the coordinate range
    pub fn diagonal(&self, direction: Diagonal) -> Option<Self> {
        let (dx, dy) = direction.to_delta();
        self.checked_add(dx, dy)
    }

    /// All four diagonal neighbours, in `Diagonal::all()` order
    pub fn diagonals(&self) -> [Option<Position>; 4] {
        Diagonal::all().map(|d| self.diagonal(d))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Diagonal replication direction.
///
/// The discriminant doubles as the index into every per-direction array
/// (replicability flags, replication energy, DNA output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagonal {
    NorthEast = 0,
    SouthEast = 1,
    NorthWest = 2,
    SouthWest = 3,
}

impl Diagonal {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Diagonal::NorthEast => (1, 1),
            Diagonal::SouthEast => (1, -1),
            Diagonal::NorthWest => (-1, 1),
            Diagonal::SouthWest => (-1, -1),
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn all() -> [Diagonal; 4] {
        [
            Diagonal::NorthEast,
            Diagonal::SouthEast,
            Diagonal::NorthWest,
            Diagonal::SouthWest,
        ]
    }
}
