//! Sudoku problem definition: compile, solve in-process, decode

use super::{load_puzzle_from_file, Grid, SolutionValidator};
use crate::sat::{Formula, SatEncoder, SatSolver, SolutionDecoder};
use crate::sat::encoder::EncodingStatistics;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// A puzzle together with its compiled formula
pub struct SudokuProblem {
    puzzle: Grid,
    encoder: SatEncoder,
    formula: Formula,
}

/// A decoded, validated solution
#[derive(Debug, Clone)]
pub struct SolvedPuzzle {
    pub grid: Grid,
    pub solve_time: Duration,
}

/// Outcome of a uniqueness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    NoSolution,
    Unique,
    Multiple,
}

impl SudokuProblem {
    /// Create a problem from a puzzle grid
    pub fn new(puzzle: Grid) -> Self {
        let encoder = SatEncoder::new();
        let formula = encoder.compile(&puzzle);
        Self {
            puzzle,
            encoder,
            formula,
        }
    }

    /// Load the puzzle from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let puzzle = load_puzzle_from_file(path).context("Failed to load puzzle file")?;
        Ok(Self::new(puzzle))
    }

    pub fn puzzle(&self) -> &Grid {
        &self.puzzle
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Solve with CaDiCaL; `None` when the puzzle has no solution
    pub fn solve(&self) -> Result<Option<SolvedPuzzle>> {
        Ok(self.solve_up_to(1)?.into_iter().next())
    }

    /// Whether the puzzle has zero, one, or several solutions
    pub fn uniqueness(&self) -> Result<Uniqueness> {
        let solutions = self.solve_up_to(2)?;
        Ok(match solutions.len() {
            0 => Uniqueness::NoSolution,
            1 => Uniqueness::Unique,
            _ => Uniqueness::Multiple,
        })
    }

    /// Find at most `limit` distinct solutions, each decoded and checked
    pub fn solve_up_to(&self, limit: usize) -> Result<Vec<SolvedPuzzle>> {
        let mut solver = SatSolver::from_formula(&self.formula)
            .context("Failed to load formula into CaDiCaL")?;
        let solutions = solver
            .solve_multiple(limit)
            .context("SAT solving failed")?;

        info!(
            clues = self.puzzle.clue_count(),
            found = solutions.len(),
            "solved puzzle"
        );

        solutions
            .into_iter()
            .map(|solution| -> Result<SolvedPuzzle> {
                let grid = SolutionDecoder::decode(&solution.assignment)
                    .context("Solver returned an assignment that does not decode")?;
                SolutionValidator::check_clues(&self.puzzle, &grid)?;
                Ok(SolvedPuzzle {
                    grid,
                    solve_time: solution.solve_time,
                })
            })
            .collect()
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoder.statistics(&self.puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::io::parse_puzzle;

    const CLASSIC: &str = "53..7....\n6..195...\n.98....6.\n8...6...3\n4..8.3..1\n7...2...6\n.6....28.\n...419..5\n....8..79\n";
    const SOLVED: &str = "534678912\n672195348\n198342567\n859761423\n426853791\n713924856\n961537284\n287419635\n345286179\n";

    #[test]
    fn test_solve_classic() {
        let problem = SudokuProblem::new(parse_puzzle(CLASSIC).unwrap());
        let solution = problem.solve().unwrap().unwrap();
        assert_eq!(solution.grid, parse_puzzle(SOLVED).unwrap());
        assert_eq!(problem.uniqueness().unwrap(), Uniqueness::Unique);
    }

    #[test]
    fn test_contradictory_clues() {
        let mut puzzle = Grid::empty();
        puzzle.set(0, 0, 4).unwrap();
        puzzle.set(0, 8, 4).unwrap();

        let problem = SudokuProblem::new(puzzle);
        assert!(problem.solve().unwrap().is_none());
        assert_eq!(problem.uniqueness().unwrap(), Uniqueness::NoSolution);
    }

    #[test]
    fn test_blank_puzzle_has_many_solutions() {
        let problem = SudokuProblem::new(Grid::empty());
        assert_eq!(problem.uniqueness().unwrap(), Uniqueness::Multiple);
        assert_eq!(problem.encoding_statistics().total_clauses, 11988);
    }
}
