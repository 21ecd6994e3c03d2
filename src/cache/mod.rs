//! Status cache.
//!
//! Keeps the last-known [`ToolStatus`] for each tool, with a time-to-live
//! after which records must be re-detected. Records live in memory and are
//! persisted as JSON Lines.

pub mod entry;
pub mod store;

pub use entry::{InstallMethod, StatusKind, ToolStatus};
pub use store::{default_ttl, StatusCache, DEFAULT_TTL_SECS};

/// Get the default status cache file.
pub fn default_cache_path() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("toolsense")
        .join("status.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cache_path_valid() {
        let path = default_cache_path();
        assert!(path.ends_with("toolsense/status.jsonl"));
    }
}
