//! Differential oracle: run two SAT solvers on the same random formulas and
//! report any disagreement

pub mod process;
pub mod verdict;
pub mod factory;
pub mod runner;

pub use process::{ExternalCommand, ProcessOutcome, RawOutput};
pub use verdict::{
    Verdict, SolverRun, VerdictProvider, LastTokenVerdict, SilentStderrVerdict, CadicalVerdict,
};
pub use factory::build_provider;
pub use runner::{DifferentialRunner, RunnerConfig, FuzzReport, Mismatch, TrialOutcome};
