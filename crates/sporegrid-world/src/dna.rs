//! Replication decision capability.

use serde::{Deserialize, Serialize};
use sporegrid_core::Diagonal;

/// Width of the DNA input vector
pub const DNA_INPUT_LEN: usize = 9;
/// Slot holding the cell's own energy
pub const SELF_SLOT: usize = 4;

/// Local energy context fed to the DNA.
///
/// Slots 0..4 hold the diagonal neighbour energies in `Diagonal` order, slot 4
/// the cell's own energy. The remaining slots are reserved and stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DnaInput(pub [f64; DNA_INPUT_LEN]);

impl DnaInput {
    pub fn new(neighbours: [f64; 4], own_energy: f64) -> Self {
        let mut slots = [0.0; DNA_INPUT_LEN];
        slots[..4].copy_from_slice(&neighbours);
        slots[SELF_SLOT] = own_energy;
        Self(slots)
    }

    pub fn neighbour(&self, direction: Diagonal) -> f64 {
        self.0[direction.index()]
    }

    pub fn own_energy(&self) -> f64 {
        self.0[SELF_SLOT]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Maps a cell's local energy context to the fraction of incoming flow it
/// forwards in each diagonal direction.
///
/// Outputs are expected in [0, 1] but the engine does not enforce it.
/// Implementations are called concurrently from row workers.
pub trait Dna: Send + Sync {
    fn compute(&self, input: &DnaInput) -> [f64; 4];
}

impl<F> Dna for F
where
    F: Fn(&DnaInput) -> [f64; 4] + Send + Sync,
{
    fn compute(&self, input: &DnaInput) -> [f64; 4] {
        self(input)
    }
}

/// Returns the same split regardless of input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantDna(pub [f64; 4]);

impl Dna for ConstantDna {
    fn compute(&self, _input: &DnaInput) -> [f64; 4] {
        self.0
    }
}
