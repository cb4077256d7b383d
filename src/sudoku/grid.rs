//! Grid representation for 9x9 Sudoku

use crate::sat::variables::{BOX_SIZE, GRID_SIZE};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 9x9 grid; 0 marks a blank cell, 1..=9 a placed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    pub cells: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Create a grid with every cell blank
    pub fn empty() -> Self {
        Self {
            cells: [[0; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Create a grid from nine rows of nine values each
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        if rows.len() != GRID_SIZE {
            anyhow::bail!("Grid has {} rows, expected {}", rows.len(), GRID_SIZE);
        }

        let mut grid = Self::empty();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != GRID_SIZE {
                anyhow::bail!("Row {} has length {}, expected {}", row, values.len(), GRID_SIZE);
            }
            for (col, &value) in values.iter().enumerate() {
                grid.set(row, col, value)?;
            }
        }
        Ok(grid)
    }

    /// Get cell value at coordinates (0 when blank)
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} grid", row, col, GRID_SIZE, GRID_SIZE);
        }
        if value as usize > GRID_SIZE {
            anyhow::bail!("Value {} at ({}, {}) is outside 0..={}", value, row, col, GRID_SIZE);
        }
        self.cells[row][col] = value;
        Ok(())
    }

    /// Filled cells as `(row, col, value)` in row-major order
    pub fn clues(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0)
                .map(move |(col, &value)| (row, col, value))
        })
    }

    /// Number of filled cells
    pub fn clue_count(&self) -> usize {
        self.clues().count()
    }

    /// Whether every cell holds a value
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(|&value| value != 0)
    }

    pub fn row(&self, row: usize) -> [u8; GRID_SIZE] {
        self.cells[row]
    }

    pub fn column(&self, col: usize) -> [u8; GRID_SIZE] {
        std::array::from_fn(|row| self.cells[row][col])
    }

    /// Values of box `box_index` (boxes numbered row-major), read row-major
    pub fn box_values(&self, box_index: usize) -> [u8; GRID_SIZE] {
        let top = (box_index / BOX_SIZE) * BOX_SIZE;
        let left = (box_index % BOX_SIZE) * BOX_SIZE;
        std::array::from_fn(|i| self.cells[top + i / BOX_SIZE][left + i % BOX_SIZE])
    }

    /// Index of the box containing `(row, col)`
    pub fn box_index(row: usize, col: usize) -> usize {
        (row / BOX_SIZE) * BOX_SIZE + col / BOX_SIZE
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

/// Rows of space-separated values; blanks render as `.`
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for values in &self.cells {
            let line = values
                .iter()
                .map(|&value| if value == 0 { ".".to_string() } else { value.to_string() })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
