//! Organism state and tick orchestration.

use crate::cell::{Cell, CellData, CellParams};
use crate::distribution;
use crate::dna::Dna;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use sporegrid_core::{Diagonal, EnergyField, OrganismConfig, Position, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A colony of cells grown from a single seed
pub struct Organism {
    origin: Position,
    positions: Grid,
    members: usize,
    previous_field: EnergyField,
    dna: Arc<dyn Dna>,
    config: OrganismConfig,
}

impl Organism {
    /// Create an organism with one seed cell at `origin`, free to replicate
    /// north-east before any occupancy check has run.
    pub fn new(origin: Position, dna: Arc<dyn Dna>, config: OrganismConfig) -> Result<Self> {
        config.validate()?;

        if !config.honor_replication_cost
            && config.replication_cost != config.effective_replication_cost()
        {
            warn!(
                configured = config.replication_cost,
                effective = config.effective_replication_cost(),
                "Configured replication cost is overridden by the internal constant"
            );
        }

        let mut seed = Cell::new(origin);
        seed.able_to_replicate[Diagonal::NorthEast.index()] = true;

        let mut positions = Grid::new();
        positions.insert(seed)?;

        info!(
            origin = %origin,
            cell_limit = config.cell_limit,
            energy_decay = config.energy_decay,
            "Organism created"
        );

        Ok(Self {
            origin,
            positions,
            members: 1,
            previous_field: EnergyField::new(),
            dna,
            config,
        })
    }

    pub fn with_dna<D: Dna + 'static>(
        origin: Position,
        dna: D,
        config: OrganismConfig,
    ) -> Result<Self> {
        Self::new(origin, Arc::new(dna), config)
    }

    /// Advance one simulation step.
    ///
    /// `ticks` only selects the first-tick branch; the organism keeps no
    /// counter of its own. The caller's field is never mutated.
    #[instrument(skip(self, food_energy), fields(members = self.members))]
    pub fn tick(&mut self, ticks: u64, food_energy: &EnergyField) {
        let energies = self.compute_energies(food_energy.clone(), ticks);
        let updated_positions = self.positions.clone();
        self.compute_cells(updated_positions, &energies);
    }

    /// Build this tick's propagated field from the external one.
    pub fn compute_energies(&mut self, energy_matrix: EnergyField, ticks: u64) -> EnergyField {
        if ticks == 0 {
            self.previous_field = energy_matrix.clone();
            return energy_matrix;
        }
        if self.members == 0 {
            return energy_matrix;
        }

        let new_field = distribution::distribute(
            &self.previous_field,
            energy_matrix,
            &mut self.positions,
            self.dna.as_ref(),
            self.config.occupancy,
        );
        self.previous_field = new_field.clone();
        new_field
    }

    /// Apply every pre-tick cell's update against `energies` and commit the
    /// result as the new grid.
    fn compute_cells(&mut self, mut cells: Grid, energies: &EnergyField) {
        let params = CellParams {
            energy_decay: self.config.energy_decay,
            replication_cost: self.replication_cost(),
        };
        let mut births = 0usize;
        let mut deaths = 0usize;
        let mut capped = 0usize;

        for pos in self.positions.positions() {
            let Some(cell) = cells.get_mut(pos) else {
                continue;
            };
            let offspring = cell.tick(energies.get(pos), &params);
            let dead = cell.is_dead();

            if !dead {
                for child in offspring {
                    if self.members >= self.config.cell_limit {
                        capped += 1;
                        continue;
                    }
                    let child_pos = child.position();
                    match cells.insert(child) {
                        Ok(()) => {
                            self.members += 1;
                            births += 1;
                        }
                        Err(e) => {
                            debug!(parent = %pos, child = %child_pos, error = %e, "Newborn dropped");
                        }
                    }
                }
            }

            if dead {
                self.members = self.members.saturating_sub(1);
                cells.remove(pos);
                deaths += 1;
            }
        }

        if capped > 0 {
            debug!(capped, cell_limit = self.config.cell_limit, "Population cap reached");
        }
        debug!(
            births,
            deaths,
            members = self.members,
            field_energy = self.previous_field.sum(),
            "Cells updated"
        );

        self.positions = cells;
    }

    /// Total energy held by the stored previous field
    pub fn sum_energies(&self) -> f64 {
        self.previous_field.sum()
    }

    /// Mark every cell dead. Removal and the `members` decrement happen on
    /// the next tick, if any.
    pub fn kill(&mut self) {
        for cell in self.positions.iter_mut() {
            cell.die();
        }
        info!(cells = self.positions.len(), "Organism killed");
    }

    pub fn members(&self) -> usize {
        self.members
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn config(&self) -> &OrganismConfig {
        &self.config
    }

    /// Replication cost passed in at construction
    pub fn configured_replication_cost(&self) -> f64 {
        self.config.replication_cost
    }

    /// Replication cost actually handed to cells
    pub fn replication_cost(&self) -> f64 {
        self.config.effective_replication_cost()
    }

    pub fn previous_field(&self) -> &EnergyField {
        &self.previous_field
    }

    pub fn grid(&self) -> &Grid {
        &self.positions
    }

    pub fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.positions.get(pos)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.positions.iter()
    }

    pub fn snapshot(&self) -> Vec<CellData> {
        self.positions.iter().map(CellData::from).collect()
    }

    pub fn stats(&self) -> OrganismStats {
        let (live_cells, dead_cells) = self
            .positions
            .iter()
            .fold((0, 0), |(live, dead), cell| {
                if cell.is_dead() {
                    (live, dead + 1)
                } else {
                    (live + 1, dead)
                }
            });

        OrganismStats {
            members: self.members,
            live_cells,
            dead_cells,
            cell_energy: self.positions.iter().map(|cell| cell.energy).sum(),
            field_energy: self.sum_energies(),
        }
    }
}

/// Aggregate diagnostics for one organism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismStats {
    pub members: usize,
    pub live_cells: usize,
    pub dead_cells: usize,
    pub cell_energy: f64,
    pub field_energy: f64,
}
