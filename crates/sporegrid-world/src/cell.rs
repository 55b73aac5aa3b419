//! Cell state and per-tick life cycle.

use serde::{Deserialize, Serialize};
use sporegrid_core::{CellId, Diagonal, Position};
use tracing::trace;

/// Energy above which a cell forwards energy and may replicate
pub const REPLICATION_THRESHOLD: f64 = 0.9;
/// Energy below which a cell dies
pub const DEATH_THRESHOLD: f64 = 0.1;
/// Forwarded fractions in (0, this] suppress replication in that direction
pub const REPLICATION_TRICKLE: f64 = 0.4;

/// Life-cycle state; `Dead` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Alive,
    Dead,
}

/// Per-tick parameters handed down by the organism
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParams {
    pub energy_decay: f64,
    /// Effective replication cost of the owning organism; not used by the
    /// decay or replication arithmetic
    pub replication_cost: f64,
}

/// A single grid occupant
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: CellId,
    pub(crate) position: Position,
    pub energy: f64,
    pub state: CellState,
    /// Per-direction replicability, indexed by `Diagonal::index`
    pub able_to_replicate: [bool; 4],
    /// Last damped DNA output for this cell
    pub replication_energy: [f64; 4],
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            id: CellId::new(),
            position,
            energy: 0.0,
            state: CellState::Alive,
            able_to_replicate: [false; 4],
            replication_energy: [0.0; 4],
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_dead(&self) -> bool {
        self.state == CellState::Dead
    }

    pub fn die(&mut self) {
        self.state = CellState::Dead;
    }

    /// Advance one tick against the field value at this cell's position.
    ///
    /// The cell's energy is replaced (not accumulated) by `food_energy`. Death
    /// is checked after replication, so a cell may leave offspring in the tick
    /// it dies; the caller decides whether those are kept.
    pub fn tick(&mut self, food_energy: f64, params: &CellParams) -> Vec<Cell> {
        self.energy = food_energy - params.energy_decay;

        let mut offspring = Vec::new();
        if self.energy > REPLICATION_THRESHOLD {
            let rep_e = self.gated_replication_energy();
            let transferred = self.energy * rep_e.iter().sum::<f64>();
            self.energy -= transferred;
            offspring = self.replicate(&rep_e, self.energy);
        }

        if self.energy < DEATH_THRESHOLD {
            self.die();
            self.energy = 0.0;
        }

        offspring
    }

    /// Replication energy with occupied directions zeroed out
    pub fn gated_replication_energy(&self) -> [f64; 4] {
        let mut rep_e = [0.0; 4];
        for d in Diagonal::all() {
            let i = d.index();
            if self.able_to_replicate[i] {
                rep_e[i] = self.replication_energy[i];
            }
        }
        rep_e
    }

    /// Spawn one newborn per free direction whose forwarded fraction is
    /// either zero or above `REPLICATION_TRICKLE`.
    pub fn replicate(&self, rep_e: &[f64; 4], host_energy: f64) -> Vec<Cell> {
        Diagonal::all()
            .into_iter()
            .filter(|d| {
                let i = d.index();
                self.able_to_replicate[i] && (rep_e[i] == 0.0 || rep_e[i] > REPLICATION_TRICKLE)
            })
            .filter_map(|d| self.position.diagonal(d).map(|pos| (d, pos)))
            .map(|(d, pos)| {
                let child = Cell::new(pos);
                trace!(
                    parent_id = %self.id,
                    child_id = %child.id,
                    direction = ?d,
                    forwarded = rep_e[d.index()],
                    host_energy,
                    "Cell replicated"
                );
                child
            })
            .collect()
    }
}

/// Serializable view of a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub id: CellId,
    pub position: Position,
    pub energy: f64,
    pub state: CellState,
    pub able_to_replicate: [bool; 4],
    pub replication_energy: [f64; 4],
}

impl From<&Cell> for CellData {
    fn from(cell: &Cell) -> Self {
        Self {
            id: cell.id,
            position: cell.position,
            energy: cell.energy,
            state: cell.state,
            able_to_replicate: cell.able_to_replicate,
            replication_energy: cell.replication_energy,
        }
    }
}
