//! In-memory status map backed by a JSON Lines file.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::entry::ToolStatus;
use crate::error::{Result, ToolsenseError};

/// Default time-to-live for a status record, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 86_400;

/// [`DEFAULT_TTL_SECS`] as a [`Duration`].
pub fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_TTL_SECS as i64)
}

/// Status cache: at most one [`ToolStatus`] per tool.
///
/// Writes replace the previous record for the tool. The backing file is
/// only touched by [`StatusCache::persist`], which rewrites it whole, so a
/// single caller should own persistence.
#[derive(Debug)]
pub struct StatusCache {
    path: Option<PathBuf>,
    ttl: Duration,
    entries: Mutex<BTreeMap<String, ToolStatus>>,
    discarded: usize,
}

impl StatusCache {
    /// A cache that is never written to disk.
    pub fn in_memory(ttl: Duration) -> Self {
        Self {
            path: None,
            ttl,
            entries: Mutex::new(BTreeMap::new()),
            discarded: 0,
        }
    }

    /// Load a cache from `path`. A missing file yields an empty cache.
    ///
    /// Malformed lines are logged and dropped; their tools will simply be
    /// re-detected.
    pub fn load(path: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        let path = path.into();
        let mut entries = BTreeMap::new();
        let mut discarded = 0;

        if path.exists() {
            let content = fs::read(&path)
                .with_context(|| format!("Failed to read status cache {}", path.display()))?;

            for (idx, raw) in content.split(|b| *b == b'\n').enumerate() {
                let parsed = std::str::from_utf8(raw)
                    .map_err(|e| e.to_string())
                    .and_then(|line| {
                        if line.trim().is_empty() {
                            Ok(None)
                        } else {
                            serde_json::from_str::<ToolStatus>(line)
                                .map(Some)
                                .map_err(|e| e.to_string())
                        }
                    });
                match parsed {
                    Ok(Some(status)) => {
                        entries.insert(status.tool.clone(), status);
                    }
                    Ok(None) => {}
                    Err(message) => {
                        let err = ToolsenseError::CacheCorrupt {
                            line: idx + 1,
                            message,
                        };
                        tracing::warn!("{} in {}; entry discarded", err, path.display());
                        discarded += 1;
                    }
                }
            }
        }

        Ok(Self {
            path: Some(path),
            ttl,
            entries: Mutex::new(entries),
            discarded,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of malformed lines dropped at load.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, ToolStatus>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Latest record for a tool, fresh or not.
    pub fn get(&self, tool: &str) -> Option<ToolStatus> {
        self.lock().get(tool).cloned()
    }

    /// Latest record for a tool if it is still within the TTL at `now`.
    pub fn get_fresh(&self, tool: &str, now: DateTime<Utc>) -> Option<ToolStatus> {
        self.get(tool).filter(|s| s.is_fresh(self.ttl, now))
    }

    /// Whether the tool has no record or only a stale one.
    pub fn is_stale(&self, tool: &str, now: DateTime<Utc>) -> bool {
        self.get_fresh(tool, now).is_none()
    }

    /// Store a record, replacing any previous one for the same tool.
    pub fn put(&self, status: ToolStatus) {
        self.lock().insert(status.tool.clone(), status);
    }

    /// Drop the record for a tool.
    pub fn remove(&self, tool: &str) -> Option<ToolStatus> {
        self.lock().remove(tool)
    }

    /// Copy of every record, keyed by tool.
    pub fn snapshot(&self) -> BTreeMap<String, ToolStatus> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Rewrite the backing file with the current records.
    ///
    /// Writes to a sibling temp file first and renames it into place, so
    /// readers never observe a half-written cache.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let snapshot = self.snapshot();
        let mut body = String::new();
        for status in snapshot.values() {
            let line = serde_json::to_string(status)
                .with_context(|| format!("Failed to serialize status for {}", status.tool))?;
            body.push_str(&line);
            body.push('\n');
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }

        let tmp = path.with_extension("jsonl.tmp");
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        file.write_all(body.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        file.sync_all().ok();
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace status cache {}", path.display()))?;

        tracing::debug!("Persisted {} status records to {}", snapshot.len(), path.display());
        Ok(())
    }
}
