//! Running external solver programs with a deadline

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// How to launch one external program
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

/// Captured result of one process run
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Finished(RawOutput),
    TimedOut(Duration),
}

/// Raw streams and exit status of a finished process
#[derive(Debug, Clone, Default)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl ExternalCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the program with `input` appended as its last argument
    pub fn run(&self, input: &Path) -> Result<ProcessOutcome> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(?cmd, "spawning solver");
        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.program.display()))?;

        // Drain both pipes on their own threads so a chatty solver cannot block on a full pipe
        let stdout_reader = spawn_reader(&mut child, Stream::Stdout);
        let stderr_reader = spawn_reader(&mut child, Stream::Stderr);

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout).context("Failed to wait for solver")? {
                Some(status) => status,
                None => {
                    warn!(program = %self.program.display(), ?timeout, "solver timed out");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(ProcessOutcome::TimedOut(timeout));
                }
            },
            None => child.wait().context("Failed to wait for solver")?,
        };

        let stdout = join_reader(stdout_reader)?;
        let stderr = join_reader(stderr_reader)?;

        Ok(ProcessOutcome::Finished(RawOutput {
            stdout,
            stderr,
            exit_code: status.code(),
            elapsed: start.elapsed(),
        }))
    }
}

enum Stream {
    Stdout,
    Stderr,
}

fn spawn_reader(child: &mut Child, stream: Stream) -> Option<thread::JoinHandle<std::io::Result<String>>> {
    let mut pipe: Box<dyn Read + Send> = match stream {
        Stream::Stdout => Box::new(child.stdout.take()?),
        Stream::Stderr => Box::new(child.stderr.take()?),
    };
    Some(thread::spawn(move || {
        let mut buffer = Vec::new();
        pipe.read_to_end(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }))
}

fn join_reader(handle: Option<thread::JoinHandle<std::io::Result<String>>>) -> Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| anyhow::anyhow!("Output reader thread panicked"))?
            .context("Failed to read solver output"),
        None => Ok(String::new()),
    }
}
