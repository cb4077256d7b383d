//! Constraint generation for the Sudoku SAT encoding

use super::variables::{VariableEncoder, GRID_SIZE};
use crate::sudoku::Grid;
use itertools::Itertools;
use std::fmt;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Number of literals
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether some literal is true under a positional assignment
    /// (`assignment[i]` is the value of variable `i + 1`; missing variables count as false)
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.literals.iter().filter(|&&literal| literal != 0).any(|&literal| {
            let value = assignment
                .get(literal.unsigned_abs() as usize - 1)
                .copied()
                .unwrap_or(false);
            if literal > 0 { value } else { !value }
        })
    }
}

/// DIMACS clause line: literals followed by the `0` terminator
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for literal in &self.literals {
            write!(f, "{} ", literal)?;
        }
        write!(f, "0")
    }
}

/// Clauses forcing exactly one of `vars` to be true: one at-least-one clause
/// followed by a pairwise at-most-one clause for every unordered pair.
///
/// # Panics
///
/// Panics if `vars` is empty.
pub fn exactly_one(vars: &[i32]) -> Vec<Clause> {
    assert!(!vars.is_empty(), "exactly_one requires at least one variable");

    let mut clauses = Vec::with_capacity(1 + vars.len() * (vars.len() - 1) / 2);
    clauses.push(Clause::new(vars.to_vec()));
    clauses.extend(
        vars.iter()
            .tuple_combinations()
            .map(|(&a, &b)| Clause::binary(-a, -b)),
    );
    clauses
}

/// Generates the clause families of a 9x9 Sudoku
#[derive(Debug, Default)]
pub struct SudokuConstraints;

impl SudokuConstraints {
    pub fn new() -> Self {
        Self
    }

    /// Generate all constraints for `puzzle`: structure first, then clues
    pub fn generate_all_constraints(&self, puzzle: &Grid) -> Vec<Clause> {
        let mut clauses = self.generate_structure_constraints();
        clauses.extend(self.generate_clue_constraints(puzzle));
        clauses
    }

    /// Cell, row, column and box constraints; independent of the clues
    pub fn generate_structure_constraints(&self) -> Vec<Clause> {
        let mut clauses = Vec::with_capacity(STRUCTURE_CLAUSE_COUNT);
        clauses.extend(self.generate_cell_constraints());
        clauses.extend(self.generate_row_constraints());
        clauses.extend(self.generate_column_constraints());
        clauses.extend(self.generate_box_constraints());
        clauses
    }

    /// Every cell holds exactly one value
    pub fn generate_cell_constraints(&self) -> Vec<Clause> {
        (0..GRID_SIZE)
            .cartesian_product(0..GRID_SIZE)
            .flat_map(|(row, col)| exactly_one(&VariableEncoder::cell_variables(row, col)))
            .collect()
    }

    /// Every value appears exactly once per row
    pub fn generate_row_constraints(&self) -> Vec<Clause> {
        (0..GRID_SIZE)
            .cartesian_product(0..GRID_SIZE)
            .flat_map(|(row, value)| exactly_one(&VariableEncoder::row_variables(row, value)))
            .collect()
    }

    /// Every value appears exactly once per column
    pub fn generate_column_constraints(&self) -> Vec<Clause> {
        (0..GRID_SIZE)
            .cartesian_product(0..GRID_SIZE)
            .flat_map(|(col, value)| exactly_one(&VariableEncoder::column_variables(col, value)))
            .collect()
    }

    /// Every value appears exactly once per 3x3 box
    pub fn generate_box_constraints(&self) -> Vec<Clause> {
        (0..GRID_SIZE)
            .cartesian_product(0..GRID_SIZE)
            .flat_map(|(box_index, value)| {
                exactly_one(&VariableEncoder::box_variables(box_index, value))
            })
            .collect()
    }

    /// One unit clause per given clue; blank cells contribute nothing
    pub fn generate_clue_constraints(&self, puzzle: &Grid) -> Vec<Clause> {
        puzzle
            .clues()
            .map(|(row, col, value)| {
                Clause::unit(VariableEncoder::encode(row, col, value as usize - 1))
            })
            .collect()
    }
}

/// Clauses in one exactly-one group of nine variables: 1 + C(9, 2)
pub const GROUP_CLAUSE_COUNT: usize = 1 + GRID_SIZE * (GRID_SIZE - 1) / 2;

/// Structure clauses: four families of 81 groups each
pub const STRUCTURE_CLAUSE_COUNT: usize = 4 * GRID_SIZE * GRID_SIZE * GROUP_CLAUSE_COUNT;

#[cfg(test)]
mod tests {
    use super::*;

    /// Every assignment of `n` variables, as positional bit vectors
    fn all_assignments(n: usize) -> impl Iterator<Item = Vec<bool>> {
        (0..1u32 << n).map(move |bits| (0..n).map(|i| bits & (1 << i) != 0).collect())
    }

    #[test]
    fn test_clause_creation() {
        assert!(Clause::unit(3).is_unit());
        assert_eq!(Clause::binary(1, -2).literals, vec![1, -2]);
        assert!(Clause::new(vec![]).is_empty());
    }

    #[test]
    fn test_clause_display() {
        assert_eq!(Clause::new(vec![1, -5, 3]).to_string(), "1 -5 3 0");
    }

    #[test]
    fn test_exactly_one_shape() {
        let clauses = exactly_one(&[1, 2, 3, 4]);
        assert_eq!(clauses.len(), 1 + 6);
        assert_eq!(clauses[0].literals, vec![1, 2, 3, 4]);
        assert!(clauses[1..].iter().all(|c| c.len() == 2 && c.literals.iter().all(|&l| l < 0)));
    }

    #[test]
    fn test_exactly_one_singleton() {
        let clauses = exactly_one(&[7]);
        assert_eq!(clauses, vec![Clause::unit(7)]);
    }

    #[test]
    #[should_panic]
    fn test_exactly_one_empty_panics() {
        exactly_one(&[]);
    }

    #[test]
    fn test_exactly_one_semantics() {
        for n in 1..=5 {
            let vars: Vec<i32> = (1..=n as i32).collect();
            let clauses = exactly_one(&vars);
            for assignment in all_assignments(n) {
                let satisfied = clauses.iter().all(|c| c.is_satisfied_by(&assignment));
                let true_count = assignment.iter().filter(|&&v| v).count();
                assert_eq!(satisfied, true_count == 1, "n={} assignment={:?}", n, assignment);
            }
        }
    }

    #[test]
    fn test_structure_clause_count() {
        let generator = SudokuConstraints::new();
        assert_eq!(generator.generate_cell_constraints().len(), 81 * 37);
        assert_eq!(generator.generate_structure_constraints().len(), 11988);
        assert_eq!(STRUCTURE_CLAUSE_COUNT, 11988);
    }

    #[test]
    fn test_clue_constraints() {
        let mut puzzle = Grid::empty();
        puzzle.set(0, 0, 5).unwrap();
        puzzle.set(8, 3, 1).unwrap();

        let clauses = SudokuConstraints::new().generate_clue_constraints(&puzzle);
        assert_eq!(
            clauses,
            vec![
                Clause::unit(VariableEncoder::encode(0, 0, 4)),
                Clause::unit(VariableEncoder::encode(8, 3, 0)),
            ]
        );
    }
}
