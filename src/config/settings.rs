//! Configuration settings for the Sudoku SAT toolkit

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub fuzz: FuzzConfig,
    pub solvers: SolversConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzConfig {
    pub trials: usize,
    pub min_variables: usize,
    pub max_variables: usize,
    pub min_clauses: usize,
    pub max_clauses: usize,
    pub fail_fast: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub work_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolversConfig {
    pub reference: SolverSpec,
    pub candidate: SolverSpec,
}

/// How a solver reports satisfiability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictConvention {
    /// Last token of stdout is the SAT or UNSAT keyword
    LastToken,
    /// Empty stderr means SAT, anything on stderr means UNSAT
    SilentStderr,
    /// In-process CaDiCaL; no program needed
    Cadical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSpec {
    pub convention: VerdictConvention,
    #[serde(default)]
    pub program: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_sat_keyword")]
    pub sat_keyword: String,
    #[serde(default = "default_unsat_keyword")]
    pub unsat_keyword: String,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_sat_keyword() -> String {
    "SATISFIABLE".to_string()
}

fn default_unsat_keyword() -> String {
    "UNSATISFIABLE".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    #[serde(default)]
    pub mismatch_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl SolverSpec {
    /// An external solver with the given convention
    pub fn external<P: Into<PathBuf>>(convention: VerdictConvention, program: P) -> Self {
        Self {
            convention,
            program: Some(program.into()),
            args: Vec::new(),
            sat_keyword: default_sat_keyword(),
            unsat_keyword: default_unsat_keyword(),
            timeout_seconds: Some(10),
        }
    }

    /// The in-process CaDiCaL solver
    pub fn cadical() -> Self {
        Self {
            convention: VerdictConvention::Cadical,
            program: None,
            args: Vec::new(),
            sat_keyword: default_sat_keyword(),
            unsat_keyword: default_unsat_keyword(),
            timeout_seconds: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn validate(&self, role: &str) -> Result<()> {
        if self.convention != VerdictConvention::Cadical {
            match &self.program {
                Some(program) if !program.as_os_str().is_empty() => {}
                _ => anyhow::bail!("{} solver needs a program for the {:?} convention", role, self.convention),
            }
        }
        if self.timeout_seconds == Some(0) {
            anyhow::bail!("{} solver timeout must be positive", role);
        }
        if self.convention == VerdictConvention::LastToken && self.sat_keyword == self.unsat_keyword {
            anyhow::bail!("{} solver SAT and UNSAT keywords must differ", role);
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fuzz: FuzzConfig {
                trials: 10_000,
                min_variables: 1,
                max_variables: 5,
                min_clauses: 1,
                max_clauses: 5,
                fail_fast: false,
                seed: None,
                workers: None,
                work_directory: None,
            },
            solvers: SolversConfig {
                reference: SolverSpec::external(VerdictConvention::LastToken, "minisat"),
                candidate: SolverSpec::external(VerdictConvention::SilentStderr, "./target/release/candidate"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                mismatch_directory: None,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let fuzz = &self.fuzz;
        if fuzz.trials == 0 {
            anyhow::bail!("Number of trials must be positive");
        }
        if fuzz.min_variables == 0 || fuzz.min_clauses == 0 {
            anyhow::bail!("Generated instances need at least one variable and one clause");
        }
        if fuzz.min_variables > fuzz.max_variables {
            anyhow::bail!("min_variables ({}) exceeds max_variables ({})", fuzz.min_variables, fuzz.max_variables);
        }
        if fuzz.min_clauses > fuzz.max_clauses {
            anyhow::bail!("min_clauses ({}) exceeds max_clauses ({})", fuzz.min_clauses, fuzz.max_clauses);
        }
        if fuzz.workers == Some(0) {
            anyhow::bail!("Worker count must be positive");
        }

        self.solvers.reference.validate("Reference")?;
        self.solvers.candidate.validate("Candidate")?;

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(trials) = cli_overrides.trials {
            self.fuzz.trials = trials;
        }
        if let Some(seed) = cli_overrides.seed {
            self.fuzz.seed = Some(seed);
        }
        if let Some(workers) = cli_overrides.workers {
            self.fuzz.workers = Some(workers);
        }
        if cli_overrides.fail_fast {
            self.fuzz.fail_fast = true;
        }
        if let Some(ref program) = cli_overrides.reference {
            self.solvers.reference.program = Some(program.clone());
        }
        if let Some(ref program) = cli_overrides.candidate {
            self.solvers.candidate.program = Some(program.clone());
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref dir) = cli_overrides.mismatch_directory {
            self.output.mismatch_directory = Some(dir.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub fail_fast: bool,
    pub reference: Option<PathBuf>,
    pub candidate: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub mismatch_directory: Option<PathBuf>,
}
