//! Core types and utilities for the sporegrid cell-colony simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod field;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use field::EnergyField;
