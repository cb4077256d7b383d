//! SAT encoding components for Sudoku

pub mod variables;
pub mod constraints;
pub mod formula;
pub mod encoder;
pub mod decoder;
pub mod solver;

pub use variables::{VariableEncoder, GRID_SIZE, VARIABLE_COUNT};
pub use constraints::{exactly_one, Clause, SudokuConstraints};
pub use formula::Formula;
pub use encoder::SatEncoder;
pub use decoder::SolutionDecoder;
pub use solver::{SatSolver, SolverSolution};
