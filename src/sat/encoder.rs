//! Compiles a puzzle into a CNF formula

use super::constraints::{SudokuConstraints, STRUCTURE_CLAUSE_COUNT};
use super::formula::Formula;
use super::variables::VARIABLE_COUNT;
use crate::sudoku::Grid;
use tracing::debug;

/// Main SAT encoder for Sudoku puzzles
#[derive(Debug, Default)]
pub struct SatEncoder {
    constraints: SudokuConstraints,
}

impl SatEncoder {
    pub fn new() -> Self {
        Self {
            constraints: SudokuConstraints::new(),
        }
    }

    /// Encode "this is a valid filled grid that agrees with the clues of `puzzle`".
    /// Always declares 729 variables; emits 11988 structure clauses plus one unit
    /// clause per clue.
    pub fn compile(&self, puzzle: &Grid) -> Formula {
        let clauses = self.constraints.generate_all_constraints(puzzle);

        debug!(
            clauses = clauses.len(),
            clues = puzzle.clue_count(),
            "compiled puzzle into CNF"
        );

        Formula::new(VARIABLE_COUNT, clauses)
    }

    /// Get encoding statistics for `puzzle`
    pub fn statistics(&self, puzzle: &Grid) -> EncodingStatistics {
        let clue_clauses = puzzle.clue_count();
        EncodingStatistics {
            total_variables: VARIABLE_COUNT,
            structure_clauses: STRUCTURE_CLAUSE_COUNT,
            clue_clauses,
            total_clauses: STRUCTURE_CLAUSE_COUNT + clue_clauses,
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub total_variables: usize,
    pub structure_clauses: usize,
    pub clue_clauses: usize,
    pub total_clauses: usize,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Structure clauses: {}", self.structure_clauses)?;
        writeln!(f, "  Clue clauses: {}", self.clue_clauses)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::variables::VariableEncoder;
    use crate::sudoku::io::parse_puzzle;

    const SOLVED: &str = "534678912\n672195348\n198342567\n859761423\n426853791\n713924856\n961537284\n287419635\n345286179\n";

    /// Positional assignment with exactly the grid's placements set
    fn assignment_for(grid: &Grid) -> Vec<bool> {
        let mut assignment = vec![false; VARIABLE_COUNT];
        for (row, col, value) in grid.clues() {
            assignment[VariableEncoder::encode(row, col, value as usize - 1) as usize - 1] = true;
        }
        assignment
    }

    #[test]
    fn test_blank_grid_counts() {
        let formula = SatEncoder::new().compile(&Grid::empty());
        assert_eq!(formula.variable_count, 729);
        assert_eq!(formula.clause_count(), 11988);
        assert!(formula.to_dimacs().starts_with("p cnf 729 11988\n"));
    }

    #[test]
    fn test_clues_add_unit_clauses() {
        let puzzle = parse_puzzle(SOLVED).unwrap();
        let encoder = SatEncoder::new();
        let formula = encoder.compile(&puzzle);
        assert_eq!(formula.clause_count(), 11988 + 81);

        let stats = encoder.statistics(&puzzle);
        assert_eq!(stats.total_clauses, formula.clause_count());
        assert_eq!(stats.clue_clauses, 81);
    }

    #[test]
    fn test_solved_grid_satisfies_formula() {
        let solved = parse_puzzle(SOLVED).unwrap();
        let formula = SatEncoder::new().compile(&solved);
        assert!(formula.is_satisfied_by(&assignment_for(&solved)));
    }

    #[test]
    fn test_invalid_grid_violates_formula() {
        let mut broken = parse_puzzle(SOLVED).unwrap();
        let a = broken.get(0, 0);
        let b = broken.get(0, 3);
        broken.set(0, 0, b).unwrap();
        broken.set(0, 3, a).unwrap();

        let formula = SatEncoder::new().compile(&Grid::empty());
        assert!(!formula.is_satisfied_by(&assignment_for(&broken)));
    }
}
