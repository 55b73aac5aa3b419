//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Replication cost applied when the configured one is not honoured
pub const INTERNAL_REPLICATION_COST: f64 = 0.5;

/// Structure consulted when recomputing a cell's replicability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancySource {
    /// A diagonal slot is taken if the freshly built energy field has a key there
    #[default]
    EnergyField,
    /// A diagonal slot is taken if a live cell sits there
    LiveCells,
}

/// Organism construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismConfig {
    /// Maximum number of members; births beyond it are discarded
    pub cell_limit: usize,
    /// Metabolic cost subtracted from every cell each tick
    pub energy_decay: f64,
    /// Replication cost requested by the caller
    pub replication_cost: f64,
    /// Use `replication_cost` instead of `INTERNAL_REPLICATION_COST`
    pub honor_replication_cost: bool,
    /// Occupancy reference for replicability flags
    pub occupancy: OccupancySource,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            cell_limit: 100,
            energy_decay: 0.05,
            replication_cost: INTERNAL_REPLICATION_COST,
            honor_replication_cost: false,
            occupancy: OccupancySource::EnergyField,
        }
    }
}

impl OrganismConfig {
    pub fn new(cell_limit: usize, energy_decay: f64, replication_cost: f64) -> Self {
        Self {
            cell_limit,
            energy_decay,
            replication_cost,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_limit == 0 {
            return Err(Error::InvalidConfig(
                "cell_limit must be positive".to_string(),
            ));
        }
        if !self.energy_decay.is_finite() || self.energy_decay < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "energy_decay must be a non-negative number, got {}",
                self.energy_decay
            )));
        }
        if !self.replication_cost.is_finite() || self.replication_cost < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "replication_cost must be a non-negative number, got {}",
                self.replication_cost
            )));
        }
        Ok(())
    }

    /// Replication cost the engine actually hands to cells
    pub fn effective_replication_cost(&self) -> f64 {
        if self.honor_replication_cost {
            self.replication_cost
        } else {
            INTERNAL_REPLICATION_COST
        }
    }
}
