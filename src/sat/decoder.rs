//! Decodes satisfying assignments back into grids

use super::variables::{VariableEncoder, GRID_SIZE, VARIABLE_COUNT};
use crate::error::SudokuSatError;
use crate::sudoku::{Grid, SolutionValidator};

/// Turns a 729-value assignment into a validated grid
pub struct SolutionDecoder;

impl SolutionDecoder {
    /// Decode and validate. Fails on a cell with several or no true values and
    /// on any row, column or box that is not a permutation of 1..=9.
    pub fn decode(assignment: &[bool]) -> Result<Grid, SudokuSatError> {
        let grid = Self::decode_unchecked(assignment)?;
        SolutionValidator::validate(&grid)?;
        Ok(grid)
    }

    /// Decode cell values only, enforcing exactly one true value per cell
    pub fn decode_unchecked(assignment: &[bool]) -> Result<Grid, SudokuSatError> {
        if assignment.len() != VARIABLE_COUNT {
            return Err(SudokuSatError::AssignmentLength {
                expected: VARIABLE_COUNT,
                actual: assignment.len(),
            });
        }

        let mut grid = Grid::empty();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                for value in 0..GRID_SIZE {
                    let id = VariableEncoder::encode(row, col, value);
                    if !assignment[id as usize - 1] {
                        continue;
                    }
                    let candidate = value as u8 + 1;
                    let existing = grid.cells[row][col];
                    if existing != 0 {
                        return Err(SudokuSatError::MultipleValuesForCell {
                            row,
                            col,
                            first: existing,
                            second: candidate,
                        });
                    }
                    grid.cells[row][col] = candidate;
                }
                if grid.cells[row][col] == 0 {
                    return Err(SudokuSatError::UnassignedCell { row, col });
                }
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Region;
    use crate::sudoku::io::parse_puzzle;

    const SOLVED: &str = "534678912\n672195348\n198342567\n859761423\n426853791\n713924856\n961537284\n287419635\n345286179\n";

    fn assignment_for(grid: &Grid) -> Vec<bool> {
        let mut assignment = vec![false; VARIABLE_COUNT];
        for (row, col, value) in grid.clues() {
            assignment[VariableEncoder::encode(row, col, value as usize - 1) as usize - 1] = true;
        }
        assignment
    }

    #[test]
    fn test_round_trip() {
        let solved = parse_puzzle(SOLVED).unwrap();
        let decoded = SolutionDecoder::decode(&assignment_for(&solved)).unwrap();
        assert_eq!(decoded, solved);
    }

    #[test]
    fn test_multiple_values_rejected() {
        let solved = parse_puzzle(SOLVED).unwrap();
        let mut assignment = assignment_for(&solved);
        // (2, 3) holds 3; also assert 8
        assignment[VariableEncoder::encode(2, 3, 7) as usize - 1] = true;

        match SolutionDecoder::decode(&assignment) {
            Err(SudokuSatError::MultipleValuesForCell { row: 2, col: 3, first: 3, second: 8 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unassigned_cell_rejected() {
        let solved = parse_puzzle(SOLVED).unwrap();
        let mut assignment = assignment_for(&solved);
        assignment[VariableEncoder::encode(6, 1, 5) as usize - 1] = false;

        assert!(matches!(
            SolutionDecoder::decode(&assignment),
            Err(SudokuSatError::UnassignedCell { row: 6, col: 1 })
        ));
    }

    #[test]
    fn test_invariant_violation_rejected() {
        // Every cell holds 1: cells are consistent, rows are not
        let mut assignment = vec![false; VARIABLE_COUNT];
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                assignment[VariableEncoder::encode(row, col, 0) as usize - 1] = true;
            }
        }

        assert!(matches!(
            SolutionDecoder::decode(&assignment),
            Err(SudokuSatError::InvariantViolated { region: Region::Row, index: 0, .. })
        ));
        assert!(SolutionDecoder::decode_unchecked(&assignment).is_ok());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            SolutionDecoder::decode(&[true; 10]),
            Err(SudokuSatError::AssignmentLength { expected: 729, actual: 10 })
        ));
    }
}
