//! Sparse scalar energy field.

use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse x -> (y -> energy) mapping.
///
/// Absent keys read as zero energy. Key presence is meaningful on its own:
/// flow contributions only land on keys that already exist, and the default
/// occupancy check treats a present key as a taken slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyField {
    rows: BTreeMap<i32, BTreeMap<i32, f64>>,
}

impl EnergyField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: BTreeMap<i32, BTreeMap<i32, f64>>) -> Self {
        Self { rows }
    }

    /// Energy at `pos`, zero when absent
    pub fn get(&self, pos: Position) -> f64 {
        self.rows
            .get(&pos.x)
            .and_then(|row| row.get(&pos.y))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rows
            .get(&pos.x)
            .is_some_and(|row| row.contains_key(&pos.y))
    }

    pub fn set(&mut self, pos: Position, energy: f64) {
        self.rows.entry(pos.x).or_default().insert(pos.y, energy);
    }

    /// Add into an existing entry; returns false and leaves the field
    /// untouched when `pos` has no key
    pub fn add_existing(&mut self, pos: Position, amount: f64) -> bool {
        match self.rows.get_mut(&pos.x).and_then(|row| row.get_mut(&pos.y)) {
            Some(value) => {
                *value += amount;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, x: i32) -> Option<&BTreeMap<i32, f64>> {
        self.rows.get(&x)
    }

    pub fn rows(&self) -> &BTreeMap<i32, BTreeMap<i32, f64>> {
        &self.rows
    }

    pub fn row_keys(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    /// Number of entries across all rows
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(BTreeMap::is_empty)
    }

    pub fn sum(&self) -> f64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, f64)> + '_ {
        self.rows.iter().flat_map(|(&x, row)| {
            row.iter().map(move |(&y, &energy)| (Position::new(x, y), energy))
        })
    }
}

impl FromIterator<(Position, f64)> for EnergyField {
    fn from_iter<I: IntoIterator<Item = (Position, f64)>>(iter: I) -> Self {
        let mut field = Self::new();
        for (pos, energy) in iter {
            field.set(pos, energy);
        }
        field
    }
}
