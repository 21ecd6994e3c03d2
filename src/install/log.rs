//! Append-only installation log.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::InstallationRecord;

/// Get the default log file.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolsense")
        .join("install.log")
}

/// One `|`-separated line per install attempt.
#[derive(Debug, Clone)]
pub struct InstallLog {
    path: PathBuf,
}

impl InstallLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record.
    pub fn append(&self, record: &InstallationRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {:?}", self.path))?;
        writeln!(file, "{}", record.to_log_line())?;

        Ok(())
    }

    /// Every readable record, oldest first. Malformed lines are skipped.
    pub fn read_all(&self) -> Result<Vec<InstallationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)
            .with_context(|| format!("Failed to open {:?}", self.path))?;
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match InstallationRecord::parse_log_line(&line) {
                Some(record) => records.push(record),
                None => tracing::debug!("Skipping malformed install log line {}", idx + 1),
            }
        }

        Ok(records)
    }

    /// The last `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<InstallationRecord>> {
        let mut records = self.read_all()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}
