//! Energy redistribution across the organism.
//!
//! Each row of the previous field is handled by an independent rayon task
//! that only reads shared state and returns its effects as a `RowFlow`. The
//! flows are then folded into the grid and the new field on the calling
//! thread, so contributions from different rows into the same target key
//! simply add up.

use crate::dna::{Dna, DnaInput};
use crate::grid::Grid;
use rayon::prelude::*;
use sporegrid_core::{Diagonal, EnergyField, OccupancySource, Position};
use tracing::{instrument, trace};

/// Fraction of forwarded energy that survives transit
pub const TRANSIT_DAMPING: f64 = 0.9;

/// Per-cell outcome of a distribution pass
#[derive(Debug, Clone, PartialEq)]
pub struct CellUpdate {
    pub position: Position,
    pub able_to_replicate: [bool; 4],
    pub replication_energy: [f64; 4],
}

/// Everything one row worker wants to write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFlow {
    pub updates: Vec<CellUpdate>,
    /// `(target, amount)` pairs; targets always exist in the new field
    pub contributions: Vec<(Position, f64)>,
}

impl RowFlow {
    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|(_, amount)| amount).sum()
    }
}

/// Read-only state shared by all row workers of one pass
pub struct DistributionContext<'a> {
    pub previous: &'a EnergyField,
    /// Freshly supplied field; only its key set is consulted
    pub new_field: &'a EnergyField,
    pub grid: &'a Grid,
    pub dna: &'a dyn Dna,
    pub occupancy: OccupancySource,
}

/// Replicability flags for the cell at `pos`: a direction is free when its
/// diagonal slot is absent from the chosen occupancy reference. Slots past
/// the edge of the coordinate range are never free.
pub fn replication_possibilities(
    pos: Position,
    occupancy: OccupancySource,
    field: &EnergyField,
    grid: &Grid,
) -> [bool; 4] {
    let mut flags = [false; 4];
    for d in Diagonal::all() {
        flags[d.index()] = match (pos.diagonal(d), occupancy) {
            (None, _) => false,
            (Some(target), OccupancySource::EnergyField) => !field.contains(target),
            (Some(target), OccupancySource::LiveCells) => !grid.contains(target),
        };
    }
    flags
}

/// Work for a single x-row of the previous field.
pub fn distribute_row(x: i32, ctx: &DistributionContext<'_>) -> RowFlow {
    let mut flow = RowFlow::default();
    let Some(row) = ctx.previous.row(x) else {
        return flow;
    };

    for (&y, &cell_energy) in row {
        let pos = Position::new(x, y);
        let Some(cell) = ctx.grid.get(pos).filter(|cell| !cell.is_dead()) else {
            continue;
        };

        let able_to_replicate =
            replication_possibilities(pos, ctx.occupancy, ctx.new_field, ctx.grid);

        let neighbours = pos
            .diagonals()
            .map(|p| p.map_or(0.0, |p| ctx.grid.energy_at(p)));
        let input = DnaInput::new(neighbours, cell.energy);
        let distributed = ctx.dna.compute(&input).map(|f| f * TRANSIT_DAMPING);

        for d in Diagonal::all() {
            let Some(target) = pos.diagonal(d) else {
                continue;
            };
            if ctx.new_field.contains(target) {
                flow.contributions
                    .push((target, cell_energy * distributed[d.index()]));
            }
        }

        flow.updates.push(CellUpdate {
            position: pos,
            able_to_replicate,
            replication_energy: distributed,
        });
    }

    flow
}

/// Run every row of `previous` in parallel and fold the results into `base`.
///
/// Returns the new field; per-cell flags and replication energy are written
/// back into `grid`.
#[instrument(skip_all, fields(rows = previous.rows().len()))]
pub fn distribute(
    previous: &EnergyField,
    base: EnergyField,
    grid: &mut Grid,
    dna: &dyn Dna,
    occupancy: OccupancySource,
) -> EnergyField {
    let row_keys = previous.row_keys();

    let flows: Vec<RowFlow> = {
        let ctx = DistributionContext {
            previous,
            new_field: &base,
            grid: &*grid,
            dna,
            occupancy,
        };
        row_keys
            .par_iter()
            .map(|&x| distribute_row(x, &ctx))
            .collect()
    };

    let mut new_field = base;
    for (x, flow) in row_keys.iter().zip(flows) {
        trace!(row = x, cells = flow.updates.len(), outflow = flow.total(), "Row distributed");

        for update in flow.updates {
            if let Some(cell) = grid.get_mut(update.position) {
                cell.able_to_replicate = update.able_to_replicate;
                cell.replication_energy = update.replication_energy;
            }
        }
        for (target, amount) in flow.contributions {
            new_field.add_existing(target, amount);
        }
    }

    new_field
}
