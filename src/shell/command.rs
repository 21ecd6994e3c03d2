//! Structured process execution.
//!
//! Commands are always built as a program plus an argument list and handed
//! straight to [`std::process::Command`]; nothing is routed through a shell,
//! so package names and paths are never re-parsed.

use crate::error::{Result, ToolsenseError};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval while waiting on a child with a deadline.
const WAIT_POLL: Duration = Duration::from_millis(10);

/// A program and its arguments, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,

    /// Extra environment variables (merged with the inherited environment).
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Stdout and stderr interleaved in arrival order.
    pub combined: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed for exceeding its timeout.
    pub timed_out: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Timeout (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Options with only a timeout set.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Default::default()
        }
    }
}

/// Output line from command execution.
#[derive(Debug, Clone)]
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Execute an invocation, capturing stdout and stderr.
///
/// A command that cannot be spawned (missing program, permission error)
/// is an error; a command that runs and fails is an `Ok` result with
/// `success == false`.
pub fn execute(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", invocation, e);
        ToolsenseError::Io(e)
    })?;

    let (tx, rx) = mpsc::channel();
    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, tx.clone(), OutputLine::Stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, tx, OutputLine::Stderr);
    }

    let status = wait_with_deadline(&mut child, options.timeout)?;
    let timed_out = status.is_none();
    if timed_out {
        tracing::warn!(
            "Command timed out after {:?}: {}",
            options.timeout.unwrap_or_default(),
            invocation
        );
    }

    // Readers finish once the child's pipes close. After a timeout a
    // grandchild may still hold them, so only drain what already arrived.
    let lines: Vec<OutputLine> = if timed_out {
        rx.try_iter().collect()
    } else {
        rx.iter().collect()
    };

    let mut stdout = String::new();
    let mut stderr = String::new();
    let mut combined = String::new();
    for line in lines {
        let (target, text) = match line {
            OutputLine::Stdout(text) => (&mut stdout, text),
            OutputLine::Stderr(text) => (&mut stderr, text),
        };
        target.push_str(&text);
        target.push('\n');
        combined.push_str(&text);
        combined.push('\n');
    }

    let exit_code = status.and_then(|s| s.code());
    Ok(CommandResult {
        exit_code,
        stdout,
        stderr,
        combined,
        duration: start.elapsed(),
        success: status.is_some_and(|s| s.success()),
        timed_out,
    })
}

fn spawn_reader<R>(
    source: R,
    tx: mpsc::Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(source);
        for line in reader.lines().map_while(std::result::Result::ok) {
            if tx.send(wrap(line)).is_err() {
                break;
            }
        }
    });
}

/// Wait for the child, killing it once `timeout` elapses.
///
/// Returns `None` when the child was killed for exceeding the deadline.
fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(WAIT_POLL);
    }
}
