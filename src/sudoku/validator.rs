//! Validation of decoded grids against Sudoku rules

use super::Grid;
use crate::error::{Region, SudokuSatError};
use crate::sat::variables::GRID_SIZE;
use std::fmt;

/// Represents a rule violation found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub region: Region,
    pub index: usize,
    pub description: String,
}

impl RuleViolation {
    fn into_error(self) -> SudokuSatError {
        SudokuSatError::InvariantViolated {
            region: self.region,
            index: self.index,
            detail: self.description,
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.region, self.index, self.description)
    }
}

/// Validates solved grids
pub struct SolutionValidator;

impl SolutionValidator {
    /// Every violation in row, column, box order
    pub fn find_violations(grid: &Grid) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        for index in 0..GRID_SIZE {
            if let Some(description) = Self::check_unit(&grid.row(index)) {
                violations.push(RuleViolation { region: Region::Row, index, description });
            }
        }
        for index in 0..GRID_SIZE {
            if let Some(description) = Self::check_unit(&grid.column(index)) {
                violations.push(RuleViolation { region: Region::Column, index, description });
            }
        }
        for index in 0..GRID_SIZE {
            if let Some(description) = Self::check_unit(&grid.box_values(index)) {
                violations.push(RuleViolation { region: Region::Box, index, description });
            }
        }

        violations
    }

    /// Fail with the first row, column or box that is not a permutation of 1..=9
    pub fn validate(grid: &Grid) -> Result<(), SudokuSatError> {
        match Self::find_violations(grid).into_iter().next() {
            Some(violation) => Err(violation.into_error()),
            None => Ok(()),
        }
    }

    /// Fail if `solution` changes any clue of `puzzle`
    pub fn check_clues(puzzle: &Grid, solution: &Grid) -> Result<(), SudokuSatError> {
        for (row, col, clue) in puzzle.clues() {
            let value = solution.get(row, col);
            if value != clue {
                return Err(SudokuSatError::ClueMismatch { row, col, clue, value });
            }
        }
        Ok(())
    }

    /// Describe why nine values are not a permutation of 1..=9, if they are not
    fn check_unit(values: &[u8; GRID_SIZE]) -> Option<String> {
        let mut seen = [false; GRID_SIZE + 1];
        for &value in values {
            if value == 0 || value as usize > GRID_SIZE {
                return Some(format!("contains invalid value {}", value));
            }
            if seen[value as usize] {
                return Some(format!("value {} appears more than once", value));
            }
            seen[value as usize] = true;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_grid() -> Grid {
        let rows = [
            "534678912", "672195348", "198342567", "859761423", "426853791", "713924856",
            "961537284", "287419635", "345286179",
        ];
        Grid::from_rows(
            rows.iter()
                .map(|line| line.bytes().map(|b| b - b'0').collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_grid() {
        assert!(SolutionValidator::validate(&solved_grid()).is_ok());
        assert!(SolutionValidator::find_violations(&solved_grid()).is_empty());
    }

    #[test]
    fn test_swapped_cells_violate_columns_and_boxes() {
        let mut grid = solved_grid();
        // Swapping two values within a row keeps the row valid
        let a = grid.get(0, 0);
        let b = grid.get(0, 3);
        grid.set(0, 0, b).unwrap();
        grid.set(0, 3, a).unwrap();

        let violations = SolutionValidator::find_violations(&grid);
        assert!(violations.iter().all(|v| v.region != Region::Row));
        assert!(violations.iter().any(|v| v.region == Region::Column && v.index == 0));
        assert!(violations.iter().any(|v| v.region == Region::Box && v.index == 1));

        match SolutionValidator::validate(&grid) {
            Err(SudokuSatError::InvariantViolated { region: Region::Column, index: 0, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_blank_cell_is_a_violation() {
        let mut grid = solved_grid();
        grid.set(4, 4, 0).unwrap();
        assert!(matches!(
            SolutionValidator::validate(&grid),
            Err(SudokuSatError::InvariantViolated { region: Region::Row, index: 4, .. })
        ));
    }

    #[test]
    fn test_check_clues() {
        let solution = solved_grid();
        let mut puzzle = Grid::empty();
        puzzle.set(0, 0, 5).unwrap();
        assert!(SolutionValidator::check_clues(&puzzle, &solution).is_ok());

        puzzle.set(0, 1, 9).unwrap();
        assert!(matches!(
            SolutionValidator::check_clues(&puzzle, &solution),
            Err(SudokuSatError::ClueMismatch { row: 0, col: 1, clue: 9, value: 3 })
        ));
    }
}
