//! Main CLI application for the Sudoku SAT toolkit

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use sudoku_sat::{
    config::{CliOverrides, OutputFormat, Settings},
    oracle::DifferentialRunner,
    sat::{SatEncoder, SolutionDecoder},
    sudoku::{
        create_example_puzzles, io::{load_assignment_from_file, parse_assignment_content, read_puzzle},
        load_puzzle_from_file, Grid, SolutionValidator, SudokuProblem, Uniqueness,
    },
    utils::{ColorOutput, GridFormatter},
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sudoku_sat")]
#[command(about = "Sudoku to SAT compiler and SAT solver differential tester")]
#[command(version = "0.1.0")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a puzzle to DIMACS CNF
    #[command(name = "to-sat", alias = "encode")]
    ToSat {
        /// Puzzle file (stdin when omitted)
        puzzle: Option<PathBuf>,

        /// Write the formula here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print encoding statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Decode a satisfying assignment into a grid
    #[command(name = "from-sat", alias = "decode")]
    FromSat {
        /// Assignment file (stdin when omitted)
        assignment: Option<PathBuf>,

        /// Input is a solver model (`v` lines) rather than a JSON array
        #[arg(long)]
        model: bool,

        /// Also check that the grid keeps this puzzle's clues
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,
    },

    /// Solve a puzzle with the built-in solver
    Solve {
        /// Puzzle file (stdin when omitted)
        puzzle: Option<PathBuf>,

        /// Also report whether the solution is unique
        #[arg(short, long)]
        unique: bool,

        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,
    },

    /// Differentially test two SAT solvers on random formulas
    Fuzz {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Number of trials (overrides config)
        #[arg(short, long)]
        trials: Option<usize>,

        /// Base seed for reproducible runs (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Worker threads (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Stop at the first disagreement
        #[arg(long)]
        fail_fast: bool,

        /// Reference solver program (overrides config)
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Candidate solver program (overrides config)
        #[arg(long)]
        candidate: Option<PathBuf>,

        /// Directory receiving mismatching formulas (overrides config)
        #[arg(long)]
        mismatch_dir: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::ToSat { puzzle, output, stats } => to_sat_command(puzzle, output, stats),
        Commands::FromSat { assignment, model, puzzle, format } => {
            from_sat_command(assignment, model, puzzle, format.into())
        }
        Commands::Solve { puzzle, unique, format } => solve_command(puzzle, unique, format.into()),
        Commands::Fuzz {
            config, trials, seed, workers, fail_fast,
            reference, candidate, mismatch_dir, format
        } => {
            let overrides = CliOverrides {
                trials,
                seed,
                workers,
                fail_fast,
                reference,
                candidate,
                format: format.map(Into::into),
                mismatch_directory: mismatch_dir,
            };
            fuzz_command(config, overrides)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

/// Logs go to stderr so stdout stays clean for formulas and grids
fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

fn load_puzzle(path: Option<&Path>) -> Result<Grid> {
    match path {
        Some(path) => load_puzzle_from_file(path),
        None => read_puzzle(&mut std::io::stdin().lock()),
    }
}

fn to_sat_command(puzzle: Option<PathBuf>, output: Option<PathBuf>, stats: bool) -> Result<()> {
    let grid = load_puzzle(puzzle.as_deref())?;
    let encoder = SatEncoder::new();
    let formula = encoder.compile(&grid);

    if stats {
        eprint!("{}", encoder.statistics(&grid));
    }

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            formula
                .write_dimacs(&mut writer)
                .and_then(|_| writer.flush())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), clauses = formula.clause_count(), "wrote formula");
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = std::io::BufWriter::new(stdout.lock());
            formula.write_dimacs(&mut handle).context("Failed to write formula")?;
            handle.flush().context("Failed to write formula")?;
        }
    }

    Ok(())
}

fn from_sat_command(
    assignment_path: Option<PathBuf>,
    model: bool,
    puzzle_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let assignment = match assignment_path {
        Some(path) => load_assignment_from_file(&path, model)?,
        None => {
            let mut content = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin().lock(), &mut content)
                .context("Failed to read assignment input")?;
            parse_assignment_content(&content, model)?
        }
    };

    let grid = SolutionDecoder::decode(&assignment)?;
    if let Some(path) = puzzle_path {
        let puzzle = load_puzzle_from_file(&path)?;
        SolutionValidator::check_clues(&puzzle, &grid)?;
    }

    print_grid(&grid, format)
}

fn solve_command(puzzle: Option<PathBuf>, unique: bool, format: OutputFormat) -> Result<()> {
    let grid = load_puzzle(puzzle.as_deref())?;
    let problem = SudokuProblem::new(grid);
    info!(clauses = problem.formula().clause_count(), "compiled puzzle");

    let solutions = problem.solve_up_to(if unique { 2 } else { 1 })?;
    let Some(first) = solutions.first() else {
        anyhow::bail!("Puzzle has no solution");
    };

    match format {
        OutputFormat::Text => {
            println!("{}", GridFormatter::format_grid_boxed(&first.grid));
            println!("Solve Time: {:.3}s", first.solve_time.as_secs_f64());
            if unique {
                let uniqueness = if solutions.len() > 1 {
                    Uniqueness::Multiple
                } else {
                    Uniqueness::Unique
                };
                println!("{}", GridFormatter::format_uniqueness(uniqueness));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "solution": first.grid,
                "solve_time_ms": first.solve_time.as_millis() as u64,
                "unique": if unique { Some(solutions.len() == 1) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

fn print_grid(grid: &Grid, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", GridFormatter::format_grid_compact(grid)),
        OutputFormat::Json => println!("{}", serde_json::to_string(grid)?),
    }
    Ok(())
}

fn fuzz_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        warn!(path = %config_path.display(), "config file not found, using defaults");
        Settings::default()
    };

    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let runner = DifferentialRunner::from_settings(&settings)?;
    let report = runner.run().context("Differential run failed")?;

    match settings.output.format {
        OutputFormat::Text => {
            print!("{}", report);
            if report.is_clean() {
                println!("{}", ColorOutput::success("No disagreements found"));
            } else {
                println!("{}", ColorOutput::error(&format!(
                    "{} disagreement(s) found", report.mismatches.len()
                )));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    report.into_result()?;
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let puzzle_dir = directory.join("puzzles");

    for dir in [&config_dir, &puzzle_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&puzzle_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", puzzle_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Run: sudoku_sat to-sat {}", puzzle_dir.join("classic.txt").display());
    println!("2. Point solvers.reference and solvers.candidate in {} at your solvers", config_path.display());
    println!("3. Run: sudoku_sat fuzz --config {}", config_path.display());

    Ok(())
}
