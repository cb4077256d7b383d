//! Error taxonomy for encoding, decoding and differential testing

use std::fmt;
use thiserror::Error;

/// A unit of the grid checked for uniqueness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Row,
    Column,
    Box,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Row => "row",
            Region::Column => "column",
            Region::Box => "box",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised while translating puzzles to and from SAT
#[derive(Debug, Error)]
pub enum SudokuSatError {
    /// Puzzle text has the wrong shape
    #[error("Malformed puzzle input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Clausal text does not follow the `p cnf` format
    #[error("Malformed formula at line {line}: {reason}")]
    MalformedFormula { line: usize, reason: String },

    /// Assignment does not cover every variable exactly
    #[error("Assignment has {actual} values, expected {expected}")]
    AssignmentLength { expected: usize, actual: usize },

    /// Two values were asserted for the same cell
    #[error("Cell ({row}, {col}) has more than one value: {first} and {second}")]
    MultipleValuesForCell {
        row: usize,
        col: usize,
        first: u8,
        second: u8,
    },

    /// No value was asserted for a cell
    #[error("Cell ({row}, {col}) has no value")]
    UnassignedCell { row: usize, col: usize },

    /// A row, column or box is not a permutation of 1..9
    #[error("Invariant violated in {region} {index}: {detail}")]
    InvariantViolated {
        region: Region,
        index: usize,
        detail: String,
    },

    /// A solved grid disagrees with one of the puzzle's clues
    #[error("Cell ({row}, {col}) holds {value} but the clue is {clue}")]
    ClueMismatch {
        row: usize,
        col: usize,
        clue: u8,
        value: u8,
    },

    /// The reference and candidate solvers disagreed
    #[error("Solvers disagree on trial {trial}: reference says {reference}, candidate says {candidate}")]
    OracleMismatch {
        trial: usize,
        reference: String,
        candidate: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
