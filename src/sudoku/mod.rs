//! Sudoku grids, puzzle I/O and rule validation

pub mod grid;
pub mod io;
pub mod problem;
pub mod validator;

pub use grid::Grid;
pub use io::{load_puzzle_from_file, parse_puzzle, save_grid_to_file, create_example_puzzles};
pub use problem::{SudokuProblem, SolvedPuzzle, Uniqueness};
pub use validator::{SolutionValidator, RuleViolation};
