//! Configuration management for the Sudoku SAT toolkit

pub mod settings;

pub use settings::{
    Settings, FuzzConfig, SolversConfig, SolverSpec, OutputConfig, OutputFormat,
    VerdictConvention, CliOverrides,
};
