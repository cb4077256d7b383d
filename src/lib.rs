//! Sudoku SAT toolkit
//!
//! Compiles 9×9 Sudoku puzzles to CNF in DIMACS form, decodes satisfying
//! assignments back into validated grids, and differentially tests SAT solvers
//! against each other on random small formulas.

pub mod config;
pub mod error;
pub mod fuzz;
pub mod oracle;
pub mod sat;
pub mod sudoku;
pub mod utils;

pub use config::Settings;
pub use error::SudokuSatError;
pub use oracle::{DifferentialRunner, FuzzReport};
pub use sat::{Formula, SatEncoder, SolutionDecoder};
pub use sudoku::Grid;

use anyhow::Result;

/// Compile a puzzle into its CNF formula
pub fn compile_puzzle(puzzle: &Grid) -> Formula {
    SatEncoder::new().compile(puzzle)
}

/// Decode a positional assignment into a validated grid
pub fn decode_assignment(assignment: &[bool]) -> Result<Grid, SudokuSatError> {
    SolutionDecoder::decode(assignment)
}

/// Main entry point for differential testing with the given settings
pub fn run_fuzz(settings: &Settings) -> Result<FuzzReport> {
    let runner = DifferentialRunner::from_settings(settings)?;
    runner.run()
}
