//! Differential testing of two solvers on random instances

use super::factory::build_provider;
use super::verdict::{SolverRun, Verdict, VerdictProvider};
use crate::config::Settings;
use crate::error::SudokuSatError;
use crate::fuzz::{GeneratorConfig, InstanceGenerator};
use crate::sat::Formula;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

const PROGRESS_INTERVAL: usize = 1000;

/// Parameters of a differential run
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub trials: usize,
    pub generator: GeneratorConfig,
    pub fail_fast: bool,
    /// Base seed; trial `i` generates its instance from `seed + i`
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub work_directory: Option<PathBuf>,
    pub mismatch_directory: Option<PathBuf>,
}

impl RunnerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let fuzz = &settings.fuzz;
        Self {
            trials: fuzz.trials,
            generator: GeneratorConfig {
                variables: fuzz.min_variables..=fuzz.max_variables,
                clauses: fuzz.min_clauses..=fuzz.max_clauses,
            },
            fail_fast: fuzz.fail_fast,
            seed: fuzz.seed,
            workers: fuzz.workers,
            work_directory: fuzz.work_directory.clone(),
            mismatch_directory: settings.output.mismatch_directory.clone(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Two solvers disagreeing on one formula
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub trial: usize,
    pub formula: String,
    pub reference: SolverRun,
    pub candidate: SolverRun,
}

/// Result of a single trial
#[derive(Debug, Clone)]
pub enum TrialOutcome {
    Agreed(Verdict),
    Mismatch(Box<Mismatch>),
    /// At least one side gave no definite answer; not compared
    Inconclusive {
        reference: Verdict,
        candidate: Verdict,
    },
    /// Not run because fail-fast tripped
    Skipped,
}

/// Summary of a differential run
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuzzReport {
    pub seed: u64,
    pub trials_requested: usize,
    pub trials_run: usize,
    pub agreed_sat: usize,
    pub agreed_unsat: usize,
    pub inconclusive: usize,
    pub skipped: usize,
    pub mismatches: Vec<Mismatch>,
    pub elapsed_ms: u64,
}

impl FuzzReport {
    pub fn agreed(&self) -> usize {
        self.agreed_sat + self.agreed_unsat
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Turn the first mismatch, if any, into an error
    pub fn into_result(self) -> Result<FuzzReport, SudokuSatError> {
        match self.mismatches.first() {
            Some(mismatch) => Err(SudokuSatError::OracleMismatch {
                trial: mismatch.trial,
                reference: mismatch.reference.verdict.to_string(),
                candidate: mismatch.candidate.verdict.to_string(),
            }),
            None => Ok(self),
        }
    }

    fn record(&mut self, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::Skipped => {
                self.skipped += 1;
                return;
            }
            TrialOutcome::Agreed(Verdict::Sat) => self.agreed_sat += 1,
            TrialOutcome::Agreed(_) => self.agreed_unsat += 1,
            TrialOutcome::Inconclusive { .. } => self.inconclusive += 1,
            TrialOutcome::Mismatch(mismatch) => self.mismatches.push(*mismatch),
        }
        self.trials_run += 1;
    }
}

impl std::fmt::Display for FuzzReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Differential Test Results:")?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Trials run: {}/{}", self.trials_run, self.trials_requested)?;
        writeln!(f, "  Agreed: {} ({} SAT, {} UNSAT)", self.agreed(), self.agreed_sat, self.agreed_unsat)?;
        writeln!(f, "  Inconclusive: {}", self.inconclusive)?;
        if self.skipped > 0 {
            writeln!(f, "  Skipped: {}", self.skipped)?;
        }
        writeln!(f, "  Mismatches: {}", self.mismatches.len())?;
        writeln!(f, "  Time: {:.3}s", self.elapsed_ms as f64 / 1000.0)?;

        for mismatch in &self.mismatches {
            writeln!(f)?;
            writeln!(
                f,
                "Trial {}: {} says {}, {} says {}",
                mismatch.trial,
                mismatch.reference.provider,
                mismatch.reference.verdict,
                mismatch.candidate.provider,
                mismatch.candidate.verdict
            )?;
            writeln!(f, "Formula:")?;
            write!(f, "{}", mismatch.formula)?;
            writeln!(f, "{} stdout: {:?}", mismatch.reference.provider, mismatch.reference.stdout)?;
            writeln!(f, "{} stderr: {:?}", mismatch.candidate.provider, mismatch.candidate.stderr)?;
        }
        Ok(())
    }
}

/// Runs the same random formulas through a reference and a candidate solver
pub struct DifferentialRunner {
    config: RunnerConfig,
    reference: Box<dyn VerdictProvider>,
    candidate: Box<dyn VerdictProvider>,
}

impl DifferentialRunner {
    pub fn new(
        config: RunnerConfig,
        reference: Box<dyn VerdictProvider>,
        candidate: Box<dyn VerdictProvider>,
    ) -> Self {
        Self {
            config,
            reference,
            candidate,
        }
    }

    /// Build both providers and the run parameters from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let reference = build_provider("reference", &settings.solvers.reference)?;
        let candidate = build_provider("candidate", &settings.solvers.candidate)?;
        Ok(Self::new(RunnerConfig::from_settings(settings), reference, candidate))
    }

    /// Run every trial on a worker pool and summarise.
    /// Disagreements are collected; provider failures abort the run.
    pub fn run(&self) -> Result<FuzzReport> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let workers = self.config.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .context("Failed to build worker pool")?;

        info!(
            trials = self.config.trials,
            workers,
            seed,
            reference = self.reference.name(),
            candidate = self.candidate.name(),
            "starting differential run"
        );

        let start = Instant::now();
        let stop = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);

        let outcomes: Vec<TrialOutcome> = pool.install(|| {
            (0..self.config.trials)
                .into_par_iter()
                .map(|trial| -> Result<TrialOutcome> {
                    if stop.load(Ordering::Relaxed) {
                        return Ok(TrialOutcome::Skipped);
                    }

                    let mut generator = InstanceGenerator::with_seed(
                        self.config.generator.clone(),
                        seed.wrapping_add(trial as u64),
                    );
                    let formula = generator.generate();
                    let outcome = self.run_trial(trial, &formula)?;

                    if self.config.fail_fast && matches!(outcome, TrialOutcome::Mismatch(_)) {
                        stop.store(true, Ordering::Relaxed);
                    }
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % PROGRESS_INTERVAL == 0 {
                        info!(done, total = self.config.trials, "fuzzing progress");
                    }
                    Ok(outcome)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut report = FuzzReport {
            seed,
            trials_requested: self.config.trials,
            ..Default::default()
        };
        for outcome in outcomes {
            report.record(outcome);
        }
        report.elapsed_ms = start.elapsed().as_millis() as u64;

        if let Some(dir) = &self.config.mismatch_directory {
            save_mismatches(&report.mismatches, dir)?;
        }

        info!(
            run = report.trials_run,
            agreed = report.agreed(),
            inconclusive = report.inconclusive,
            mismatches = report.mismatches.len(),
            "differential run finished"
        );
        Ok(report)
    }

    /// Write `formula` to its own temporary file, run both solvers on it
    /// concurrently, and compare their verdicts. The file is removed on return.
    pub fn run_trial(&self, trial: usize, formula: &Formula) -> Result<TrialOutcome> {
        let prefix = format!("trial-{}-", trial);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".cnf");
        let mut file = match &self.config.work_directory {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .with_context(|| format!("Failed to create input file for trial {}", trial))?;

        formula
            .write_dimacs(&mut file)
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to write input file for trial {}", trial))?;
        let path = file.path();

        let (reference, candidate) = rayon::join(
            || self.reference.check(formula, path),
            || self.candidate.check(formula, path),
        );
        let reference = reference.with_context(|| format!("Trial {}: {} failed", trial, self.reference.name()))?;
        let candidate = candidate.with_context(|| format!("Trial {}: {} failed", trial, self.candidate.name()))?;

        Ok(compare(trial, formula, reference, candidate))
    }
}

fn compare(trial: usize, formula: &Formula, reference: SolverRun, candidate: SolverRun) -> TrialOutcome {
    if !reference.verdict.is_definite() || !candidate.verdict.is_definite() {
        warn!(
            trial,
            reference = %reference.verdict,
            candidate = %candidate.verdict,
            "inconclusive trial"
        );
        return TrialOutcome::Inconclusive {
            reference: reference.verdict,
            candidate: candidate.verdict,
        };
    }

    if reference.verdict == candidate.verdict {
        debug!(trial, verdict = %reference.verdict, "solvers agree");
        return TrialOutcome::Agreed(reference.verdict);
    }

    let formula = formula.to_dimacs();
    error!(
        trial,
        reference = %reference.verdict,
        candidate = %candidate.verdict,
        reference_stdout = %reference.stdout,
        candidate_stderr = %candidate.stderr,
        %formula,
        "solvers disagree"
    );
    TrialOutcome::Mismatch(Box::new(Mismatch {
        trial,
        formula,
        reference,
        candidate,
    }))
}

fn save_mismatches(mismatches: &[Mismatch], dir: &Path) -> Result<()> {
    if mismatches.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    for mismatch in mismatches {
        let path = dir.join(format!("mismatch_{}.cnf", mismatch.trial));
        std::fs::write(&path, &mismatch.formula)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::CadicalVerdict;
    use crate::sat::Clause;
    use tempfile::tempdir;

    /// Answers a fixed verdict regardless of the formula
    struct FixedVerdict(Verdict);

    impl VerdictProvider for FixedVerdict {
        fn name(&self) -> &str {
            "fixed"
        }

        fn check(&self, _formula: &Formula, path: &Path) -> Result<SolverRun> {
            assert!(path.exists(), "trial input must exist while solvers run");
            Ok(SolverRun {
                provider: "fixed".to_string(),
                verdict: self.0.clone(),
                stdout: String::new(),
                stderr: String::new(),
                exit_code: Some(0),
                elapsed_ms: 0,
            })
        }
    }

    struct FailingProvider;

    impl VerdictProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn check(&self, _formula: &Formula, _path: &Path) -> Result<SolverRun> {
            anyhow::bail!("solver binary missing")
        }
    }

    fn config(trials: usize) -> RunnerConfig {
        RunnerConfig {
            trials,
            seed: Some(1234),
            workers: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_solvers_agree() {
        let runner = DifferentialRunner::new(
            config(200),
            Box::new(CadicalVerdict::new("reference")),
            Box::new(CadicalVerdict::new("candidate")),
        );
        let report = runner.run().unwrap();

        assert_eq!(report.trials_run, 200);
        assert_eq!(report.agreed(), 200);
        assert!(report.is_clean());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_unsat_instance_mismatch_is_reported() {
        let runner = DifferentialRunner::new(
            config(1),
            Box::new(CadicalVerdict::new("reference")),
            Box::new(FixedVerdict(Verdict::Sat)),
        );
        let formula = Formula::new(1, vec![Clause::unit(1), Clause::unit(-1)]);

        match runner.run_trial(0, &formula).unwrap() {
            TrialOutcome::Mismatch(mismatch) => {
                assert_eq!(mismatch.reference.verdict, Verdict::Unsat);
                assert_eq!(mismatch.candidate.verdict, Verdict::Sat);
                assert!(mismatch.formula.starts_with("p cnf 1 2\n"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_mismatches_accumulate_without_fail_fast() {
        let temp_dir = tempdir().unwrap();
        let mut config = config(50);
        config.mismatch_directory = Some(temp_dir.path().to_path_buf());

        // Always-UNSAT disagrees with CaDiCaL on every satisfiable instance
        let runner = DifferentialRunner::new(
            config,
            Box::new(CadicalVerdict::new("reference")),
            Box::new(FixedVerdict(Verdict::Unsat)),
        );
        let report = runner.run().unwrap();

        assert_eq!(report.trials_run, 50);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.mismatches.len(), report.trials_run - report.agreed_unsat);
        assert!(!report.mismatches.is_empty());
        for mismatch in &report.mismatches {
            assert!(temp_dir.path().join(format!("mismatch_{}.cnf", mismatch.trial)).exists());
        }
        assert!(matches!(
            report.into_result(),
            Err(SudokuSatError::OracleMismatch { .. })
        ));
    }

    #[test]
    fn test_fail_fast_skips_remaining_trials() {
        let mut config = config(500);
        config.fail_fast = true;
        config.workers = Some(1);

        let runner = DifferentialRunner::new(
            config,
            Box::new(FixedVerdict(Verdict::Sat)),
            Box::new(FixedVerdict(Verdict::Unsat)),
        );
        let report = runner.run().unwrap();

        assert!(!report.mismatches.is_empty());
        assert!(report.skipped > 0);
        assert_eq!(report.trials_run + report.skipped, 500);
    }

    #[test]
    fn test_inconclusive_trials_are_excluded() {
        let runner = DifferentialRunner::new(
            config(10),
            Box::new(FixedVerdict(Verdict::Inconclusive("timed out".to_string()))),
            Box::new(FixedVerdict(Verdict::Unsat)),
        );
        let report = runner.run().unwrap();
        assert_eq!(report.inconclusive, 10);
        assert!(report.is_clean());
    }

    #[test]
    fn test_provider_error_aborts() {
        let runner = DifferentialRunner::new(
            config(5),
            Box::new(CadicalVerdict::new("reference")),
            Box::new(FailingProvider),
        );
        assert!(runner.run().is_err());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let make = || {
            DifferentialRunner::new(
                config(30),
                Box::new(CadicalVerdict::new("reference")),
                Box::new(FixedVerdict(Verdict::Unsat)),
            )
        };
        let first = make().run().unwrap();
        let second = make().run().unwrap();
        let trials = |r: &FuzzReport| r.mismatches.iter().map(|m| m.trial).collect::<Vec<_>>();
        let mut a = trials(&first);
        let mut b = trials(&second);
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(first.seed, 1234);
    }
}
