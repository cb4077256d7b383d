//! Satisfiability verdicts and the providers that produce them
//!
//! Each solver has its own way of reporting an answer. Those conventions are
//! parsed here and nowhere else, so the trial loop only ever sees a [`Verdict`].

use super::process::{ExternalCommand, ProcessOutcome, RawOutput};
use crate::sat::{Formula, SatSolver};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Answer of one solver on one formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum Verdict {
    Sat,
    Unsat,
    /// Neither SAT nor UNSAT: timed out or answered something unrecognised
    Inconclusive(String),
}

impl Verdict {
    pub fn is_definite(&self) -> bool {
        matches!(self, Verdict::Sat | Verdict::Unsat)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Sat => write!(f, "SAT"),
            Verdict::Unsat => write!(f, "UNSAT"),
            Verdict::Inconclusive(reason) => write!(f, "INCONCLUSIVE ({})", reason),
        }
    }
}

/// One solver invocation: the verdict plus everything needed to diagnose it
#[derive(Debug, Clone, Serialize)]
pub struct SolverRun {
    pub provider: String,
    pub verdict: Verdict,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub elapsed_ms: u64,
}

impl SolverRun {
    fn from_output(provider: &str, verdict: Verdict, output: RawOutput) -> Self {
        Self {
            provider: provider.to_string(),
            verdict,
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
            elapsed_ms: output.elapsed.as_millis() as u64,
        }
    }

    fn timed_out(provider: &str, timeout: std::time::Duration) -> Self {
        Self {
            provider: provider.to_string(),
            verdict: Verdict::Inconclusive(format!("timed out after {:?}", timeout)),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            elapsed_ms: timeout.as_millis() as u64,
        }
    }
}

/// Anything that can decide satisfiability of a formula.
///
/// `path` holds the formula in DIMACS form for out-of-process solvers; in-process
/// providers may ignore it and use `formula` directly.
pub trait VerdictProvider: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, formula: &Formula, path: &Path) -> Result<SolverRun>;
}

/// Reads the verdict from the last whitespace-separated token of stdout
/// (minisat style: `... SATISFIABLE` / `... UNSATISFIABLE`)
pub struct LastTokenVerdict {
    name: String,
    command: ExternalCommand,
    sat_keyword: String,
    unsat_keyword: String,
}

impl LastTokenVerdict {
    pub fn new(name: &str, command: ExternalCommand, sat_keyword: &str, unsat_keyword: &str) -> Self {
        Self {
            name: name.to_string(),
            command,
            sat_keyword: sat_keyword.to_string(),
            unsat_keyword: unsat_keyword.to_string(),
        }
    }

    /// Map captured stdout to a verdict
    pub fn parse_stdout(&self, stdout: &str) -> Verdict {
        match stdout.split_whitespace().last() {
            Some(token) if token == self.sat_keyword => Verdict::Sat,
            Some(token) if token == self.unsat_keyword => Verdict::Unsat,
            Some(token) => Verdict::Inconclusive(format!("unexpected final token '{}'", token)),
            None => Verdict::Inconclusive("empty stdout".to_string()),
        }
    }
}

impl VerdictProvider for LastTokenVerdict {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, _formula: &Formula, path: &Path) -> Result<SolverRun> {
        let outcome = self
            .command
            .run(path)
            .with_context(|| format!("{} failed to run", self.name))?;
        Ok(match outcome {
            ProcessOutcome::Finished(output) => {
                let verdict = self.parse_stdout(&output.stdout);
                SolverRun::from_output(&self.name, verdict, output)
            }
            ProcessOutcome::TimedOut(timeout) => SolverRun::timed_out(&self.name, timeout),
        })
    }
}

/// Treats an empty stderr as SAT and any stderr output as UNSAT.
///
/// This only holds for a solver that is silent on stderr when it finds a model
/// and prints its refutation trace there otherwise. It is a property of that one
/// solver's logging, not a general solver contract.
pub struct SilentStderrVerdict {
    name: String,
    command: ExternalCommand,
}

impl SilentStderrVerdict {
    pub fn new(name: &str, command: ExternalCommand) -> Self {
        Self {
            name: name.to_string(),
            command,
        }
    }

    pub fn parse_stderr(stderr: &str) -> Verdict {
        if stderr.is_empty() {
            Verdict::Sat
        } else {
            Verdict::Unsat
        }
    }
}

impl VerdictProvider for SilentStderrVerdict {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, _formula: &Formula, path: &Path) -> Result<SolverRun> {
        let outcome = self
            .command
            .run(path)
            .with_context(|| format!("{} failed to run", self.name))?;
        Ok(match outcome {
            ProcessOutcome::Finished(output) => {
                let verdict = Self::parse_stderr(&output.stderr);
                SolverRun::from_output(&self.name, verdict, output)
            }
            ProcessOutcome::TimedOut(timeout) => SolverRun::timed_out(&self.name, timeout),
        })
    }
}

/// Solves in-process with CaDiCaL
pub struct CadicalVerdict {
    name: String,
}

impl CadicalVerdict {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl VerdictProvider for CadicalVerdict {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, formula: &Formula, _path: &Path) -> Result<SolverRun> {
        let start = Instant::now();
        let mut solver = SatSolver::from_formula(formula)?;
        let verdict = match solver.solve()? {
            Some(solution) => {
                if !formula.is_satisfied_by(&solution.assignment) {
                    anyhow::bail!("CaDiCaL returned a model that does not satisfy the formula");
                }
                Verdict::Sat
            }
            None => Verdict::Unsat,
        };

        Ok(SolverRun {
            provider: self.name.clone(),
            stdout: format!("s {}", if verdict == Verdict::Sat { "SATISFIABLE" } else { "UNSATISFIABLE" }),
            verdict,
            stderr: String::new(),
            exit_code: None,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}
