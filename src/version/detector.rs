//! Version probing for installed executables.

use std::path::Path;
use std::time::Duration;

use super::Version;
use crate::error::{Result, ToolsenseError};
use crate::shell::{execute, CommandOptions, Invocation};

/// Flags tried in order when a tool declares no override.
pub const DEFAULT_VERSION_FLAGS: &[&str] = &["--version", "-V", "version", "-v"];

/// Runs a tool's version flag and extracts a [`Version`] from its output.
#[derive(Debug, Clone)]
pub struct VersionDetector {
    timeout: Duration,
}

impl Default for VersionDetector {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl VersionDetector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `executable` for its version.
    ///
    /// With `override_args`, only that argument list is tried. Otherwise each
    /// of [`DEFAULT_VERSION_FLAGS`] is tried until one yields a version.
    /// Output is read from stdout and stderr regardless of exit status, since
    /// several tools print their version to stderr or exit non-zero.
    pub fn detect(&self, executable: &Path, override_args: Option<&[String]>) -> Result<Version> {
        let program = executable.to_string_lossy().into_owned();
        let attempts: Vec<Vec<String>> = match override_args {
            Some(args) => vec![args.to_vec()],
            None => DEFAULT_VERSION_FLAGS
                .iter()
                .map(|flag| vec![flag.to_string()])
                .collect(),
        };

        let options = CommandOptions::with_timeout(self.timeout);
        let mut last_output = String::new();

        for args in attempts {
            let invocation = Invocation::new(program.clone()).args(args);
            let result = match execute(&invocation, &options) {
                Ok(result) => result,
                Err(e) => {
                    tracing::debug!("Version probe {} failed to run: {}", invocation, e);
                    continue;
                }
            };
            if result.timed_out {
                tracing::debug!("Version probe {} timed out", invocation);
                continue;
            }
            if let Some(version) = Version::extract(&result.combined) {
                tracing::debug!("{} reports version {}", program, version);
                return Ok(version);
            }
            last_output = result.combined;
        }

        Err(ToolsenseError::VersionUnparseable {
            input: first_line(&last_output, &program),
        })
    }
}

fn first_line(output: &str, fallback: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
