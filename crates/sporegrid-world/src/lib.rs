//! Colony simulation engine.
//!
//! Cells live on a sparse, unbounded grid, feed on an externally supplied
//! energy field and replicate into free diagonal neighbours as directed by a
//! pluggable DNA function.

pub mod cell;
pub mod distribution;
pub mod dna;
pub mod grid;
pub mod organism;

pub use cell::{Cell, CellData, CellParams, CellState};
pub use dna::{ConstantDna, Dna, DnaInput};
pub use grid::Grid;
pub use organism::{Organism, OrganismStats};
