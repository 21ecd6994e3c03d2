//! Pre-install backups of toolsense's own state files.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default backup directory.
pub fn default_backup_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolsense")
        .join("backups")
}

/// Copy each existing file in `files` into `root/<timestamp>/`.
///
/// Missing files are skipped. Returns the directory that was created.
pub fn snapshot_files(root: &Path, files: &[PathBuf]) -> Result<PathBuf> {
    let dir = root.join(Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string());
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create backup directory {:?}", dir))?;

    for file in files.iter().filter(|f| f.is_file()) {
        let Some(name) = file.file_name() else {
            continue;
        };
        fs::copy(file, dir.join(name))
            .with_context(|| format!("Failed to back up {:?}", file))?;
    }

    tracing::debug!("Backed up state to {}", dir.display());
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_existing_files_only() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("status.jsonl");
        fs::write(&cache, "{}\n").unwrap();
        let missing = temp.path().join("install.log");

        let dir = snapshot_files(&temp.path().join("backups"), &[cache, missing]).unwrap();

        assert!(dir.join("status.jsonl").is_file());
        assert!(!dir.join("install.log").exists());
        assert!(dir.starts_with(temp.path().join("backups")));
    }
}
