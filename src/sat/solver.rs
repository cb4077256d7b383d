//! In-process SAT solving using CaDiCaL

use super::constraints::Clause;
use super::formula::Formula;
use anyhow::Result;
use cadical::Solver;
use std::time::{Duration, Instant};
use tracing::debug;

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    /// Largest variable seen in a clause; CaDiCaL only knows about these
    referenced_variables: usize,
    clause_count: usize,
}

/// A satisfying assignment found by the solver
#[derive(Debug, Clone)]
pub struct SolverSolution {
    /// `assignment[i]` is the value of variable `i + 1`
    pub assignment: Vec<bool>,
    pub solve_time: Duration,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            referenced_variables: 0,
            clause_count: 0,
        }
    }

    /// Create a solver loaded with every clause of `formula`
    pub fn from_formula(formula: &Formula) -> Result<Self> {
        let mut solver = Self::new();
        solver.add_formula(formula)?;
        Ok(solver)
    }

    /// Add a formula; its declared variable count widens the extracted assignment
    pub fn add_formula(&mut self, formula: &Formula) -> Result<()> {
        self.variable_count = self.variable_count.max(formula.variable_count);
        self.add_clauses(&formula.clauses)
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            anyhow::bail!("Cannot add empty clause (unsatisfiable)");
        }
        if clause.literals.contains(&0) {
            anyhow::bail!("Clause {} contains the reserved literal 0", clause);
        }

        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            self.referenced_variables = self.referenced_variables.max(var);
        }
        self.variable_count = self.variable_count.max(self.referenced_variables);

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
        Ok(())
    }

    /// Solve the SAT problem and return the first solution
    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        debug!(
            variables = self.variable_count,
            clauses = self.clause_count,
            ?result,
            elapsed_ms = solve_time.as_millis() as u64,
            "cadical finished"
        );

        match result {
            Some(true) => Ok(Some(SolverSolution {
                assignment: self.extract_assignment(),
                solve_time,
            })),
            Some(false) => Ok(None),
            None => anyhow::bail!("CaDiCaL stopped without a result"),
        }
    }

    /// Solve and find multiple solutions up to a limit
    pub fn solve_multiple(&mut self, max_solutions: usize) -> Result<Vec<SolverSolution>> {
        let mut solutions = Vec::new();

        for _ in 0..max_solutions {
            match self.solve()? {
                Some(solution) => {
                    // Add blocking clause to prevent finding the same solution again
                    self.add_blocking_clause(&solution.assignment)?;
                    solutions.push(solution);
                }
                None => break,
            }
        }

        Ok(solutions)
    }

    /// Extract variable assignment from the solver; unassigned variables read as false
    fn extract_assignment(&self) -> Vec<bool> {
        (1..=self.variable_count)
            .map(|var| {
                var <= self.referenced_variables
                    && self.solver.value(var as i32).unwrap_or(false)
            })
            .collect()
    }

    /// Add a blocking clause to prevent finding the same solution again
    fn add_blocking_clause(&mut self, assignment: &[bool]) -> Result<()> {
        let blocking_literals = assignment
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let var = index as i32 + 1;
                if value { -var } else { var }
            })
            .collect();

        self.add_clause(&Clause::new(blocking_literals))
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = SatSolver::new();

        // x1 ∨ x2, ¬x1 ∨ x2
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();
        solver.add_clause(&Clause::new(vec![-1, 2])).unwrap();

        let solution = solver.solve().unwrap().unwrap();
        assert_eq!(solution.assignment.len(), 2);
        assert!(solution.assignment[1]);
    }

    #[test]
    fn test_unsatisfiable() {
        let formula = Formula::new(1, vec![Clause::unit(1), Clause::unit(-1)]);
        let mut solver = SatSolver::from_formula(&formula).unwrap();
        assert!(solver.solve().unwrap().is_none());
    }

    #[test]
    fn test_declared_variables_are_extracted() {
        let formula = Formula::new(4, vec![Clause::unit(2)]);
        let mut solver = SatSolver::from_formula(&formula).unwrap();
        let solution = solver.solve().unwrap().unwrap();
        assert_eq!(solution.assignment.len(), 4);
        assert!(formula.is_satisfied_by(&solution.assignment));
    }

    #[test]
    fn test_multiple_solutions() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();

        let solutions = solver.solve_multiple(5).unwrap();
        // x1 ∨ x2 has exactly three models
        assert_eq!(solutions.len(), 3);
        for solution in &solutions {
            assert!(solution.assignment[0] || solution.assignment[1]);
        }
    }

    #[test]
    fn test_invalid_clauses_rejected() {
        let mut solver = SatSolver::new();
        assert!(solver.add_clause(&Clause::new(vec![])).is_err());
        assert!(solver.add_clause(&Clause::new(vec![1, 0])).is_err());
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::new(vec![1, -5, 3])).unwrap();
        assert_eq!(solver.variable_count(), 5);
        solver.add_clause(&Clause::new(vec![2, -7])).unwrap();
        assert_eq!(solver.variable_count(), 7);
    }
}
