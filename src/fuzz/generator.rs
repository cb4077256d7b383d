//! Random CNF instances for differential testing

use crate::sat::{Clause, Formula};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Bounds on the size of generated instances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub variables: RangeInclusive<usize>,
    pub clauses: RangeInclusive<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            variables: 1..=5,
            clauses: 1..=5,
        }
    }
}

/// Generates small random formulas.
///
/// Each clause draws, for every variable, one of absent / positive / negative
/// with equal odds, and redraws the whole clause while it comes out empty. The
/// redraw skews clause width upward slightly; that bias is kept on purpose so
/// the instance distribution stays stable across versions.
pub struct InstanceGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl InstanceGenerator {
    /// Create a generator seeded from system entropy
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible generator
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw sizes from the configured ranges and generate
    pub fn generate(&mut self) -> Formula {
        let variables = self.rng.gen_range(self.config.variables.clone());
        let clauses = self.rng.gen_range(self.config.clauses.clone());
        self.generate_with(variables, clauses)
    }

    /// Generate a formula with exactly `variables` variables and `clauses` clauses
    ///
    /// # Panics
    ///
    /// Panics if `variables` is zero while `clauses` is not.
    pub fn generate_with(&mut self, variables: usize, clauses: usize) -> Formula {
        assert!(
            variables > 0 || clauses == 0,
            "cannot build non-empty clauses over zero variables"
        );
        let clauses = (0..clauses).map(|_| self.random_clause(variables)).collect();
        Formula::new(variables, clauses)
    }

    fn random_clause(&mut self, variables: usize) -> Clause {
        let mut literals = Vec::new();
        while literals.is_empty() {
            for var in 1..=variables as i32 {
                match self.rng.gen_range(0..3) {
                    1 => literals.push(var),
                    2 => literals.push(-var),
                    _ => {}
                }
            }
        }
        Clause::new(literals)
    }
}
