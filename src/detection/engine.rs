//! Detection engine: probes tools and records their status.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use super::candidate::{CandidateSource, NoCandidates};
use super::phase::DetectionPhase;
use crate::cache::{InstallMethod, StatusCache, StatusKind, ToolStatus};
use crate::error::{Result, ToolsenseError};
use crate::registry::{ToolDescriptor, ToolRegistry};
use crate::shell::{parse_system_path, resolve_executable};
use crate::version::{check_bounds, Compatibility, VersionDetector};

/// How a batch of tools is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Sequential,
    /// Bounded pool with this many workers (at least 1).
    Pool(usize),
}

impl BatchMode {
    pub fn from_settings(parallel: bool, max_workers: usize) -> Self {
        if parallel && max_workers > 1 {
            BatchMode::Pool(max_workers)
        } else {
            BatchMode::Sequential
        }
    }
}

/// Outcome of a batch detection.
#[derive(Debug, Default)]
pub struct DetectionReport {
    /// Statuses in tool-name order.
    pub statuses: Vec<ToolStatus>,

    /// Tools that could not be attempted.
    pub failures: Vec<(String, ToolsenseError)>,
}

impl DetectionReport {
    pub fn count(&self, kind: StatusKind) -> usize {
        self.statuses.iter().filter(|s| s.status == kind).count()
    }
}

/// Probes tools on PATH and writes results into the [`StatusCache`].
pub struct DetectionEngine {
    registry: Arc<ToolRegistry>,
    cache: Arc<StatusCache>,
    detector: VersionDetector,
    candidates: Box<dyn CandidateSource>,
    path_entries: Vec<PathBuf>,
}

impl DetectionEngine {
    /// Create an engine that searches the process PATH.
    pub fn new(registry: Arc<ToolRegistry>, cache: Arc<StatusCache>) -> Self {
        Self {
            registry,
            cache,
            detector: VersionDetector::default(),
            candidates: Box::new(NoCandidates),
            path_entries: parse_system_path(),
        }
    }

    /// Search these directories instead of PATH.
    pub fn with_path(mut self, entries: Vec<PathBuf>) -> Self {
        self.path_entries = entries;
        self
    }

    pub fn with_detector(mut self, detector: VersionDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_candidates(mut self, candidates: Box<dyn CandidateSource>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path_entries
    }

    /// Determine a tool's status without touching the cache.
    ///
    /// The first candidate executable that resolves wins; later candidates
    /// are not scanned. An unreadable version leaves the tool `installed`.
    pub fn probe(&self, tool: &ToolDescriptor) -> ToolStatus {
        let name = tool.name.as_str();
        let mut phase = DetectionPhase::Unknown.advance(name, DetectionPhase::Probing);

        let Some(path) = tool
            .executables
            .iter()
            .find_map(|exe| resolve_executable(exe, &self.path_entries))
        else {
            phase = phase.advance(name, DetectionPhase::NotInstalled);
            tracing::debug!("{}: {}", name, phase);
            return ToolStatus::not_installed(name, Utc::now());
        };
        phase = phase.advance(name, DetectionPhase::Installed);

        let version = match self.detector.detect(&path, tool.version_args.as_deref()) {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::debug!("{}: version unknown ({})", name, e);
                None
            }
        };

        if let Some(version) = &version {
            let compatibility = check_bounds(
                Some(version),
                tool.min_version.as_ref(),
                tool.max_version.as_ref(),
            );
            phase = match compatibility {
                Compatibility::Incompatible { violated } => {
                    let err = ToolsenseError::VersionIncompatible {
                        tool: name.to_string(),
                        version: version.to_string(),
                        constraint: violated.to_string(),
                    };
                    tracing::info!("{}", err);
                    phase.advance(name, DetectionPhase::Incompatible)
                }
                Compatibility::Compatible | Compatibility::Unknown => {
                    let method = InstallMethod::infer_from_path(&path);
                    let newer = self
                        .candidates
                        .candidate_version(tool, Some(method))
                        .filter(|candidate| candidate > version);
                    match newer {
                        Some(candidate) => {
                            tracing::debug!("{}: {} available (have {})", name, candidate, version);
                            phase.advance(name, DetectionPhase::Outdated)
                        }
                        None => phase.advance(name, DetectionPhase::Compatible),
                    }
                }
            };
        }

        debug_assert!(phase.is_settled(), "{} left detection in {}", name, phase);
        let kind = phase.status_kind().unwrap_or(StatusKind::Installed);
        tracing::debug!("{}: {} at {}", name, kind, path.display());
        ToolStatus::found(name, kind, version, path, Utc::now())
    }

    /// Detect one tool, record it, and persist the cache.
    pub fn detect(&self, name: &str) -> Result<ToolStatus> {
        let tool = self.registry.require(name)?;
        let status = self.probe(tool);
        self.cache.put(status.clone());
        self.cache.persist()?;
        Ok(status)
    }

    /// The cached status if fresh, otherwise a new detection.
    pub fn status(&self, name: &str) -> Result<ToolStatus> {
        self.registry.require(name)?;
        match self.cache.get_fresh(name, Utc::now()) {
            Some(status) => Ok(status),
            None => self.detect(name),
        }
    }

    /// Detect every registry tool.
    pub fn detect_all(&self, mode: BatchMode) -> Result<DetectionReport> {
        let names: Vec<String> = self.registry.names().into_iter().map(String::from).collect();
        self.detect_many(&names, mode, &mut |_| {})
    }

    /// Re-detect only tools whose cached status is missing or stale.
    pub fn refresh_stale(&self, mode: BatchMode) -> Result<DetectionReport> {
        let now = Utc::now();
        let stale: Vec<String> = self
            .registry
            .names()
            .into_iter()
            .filter(|name| self.cache.is_stale(name, now))
            .map(String::from)
            .collect();
        tracing::debug!("{} of {} tools need refresh", stale.len(), self.registry.len());
        self.detect_many(&stale, mode, &mut |_| {})
    }

    /// Detect the named tools, calling `on_result` as each one completes.
    ///
    /// Unknown names are reported as failures without stopping the batch.
    /// Returns only after every tool has been attempted; the cache file is
    /// written once, by the calling thread.
    pub fn detect_many(
        &self,
        names: &[String],
        mode: BatchMode,
        on_result: &mut dyn FnMut(&ToolStatus),
    ) -> Result<DetectionReport> {
        let mut report = DetectionReport::default();
        let mut tools = Vec::with_capacity(names.len());
        for name in names {
            match self.registry.require(name) {
                Ok(tool) => tools.push(tool),
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.failures.push((name.clone(), e));
                }
            }
        }

        let mut sink = |status: ToolStatus| {
            self.cache.put(status.clone());
            on_result(&status);
            report.statuses.push(status);
        };

        match mode {
            BatchMode::Sequential => {
                for tool in tools {
                    sink(self.probe(tool));
                }
            }
            BatchMode::Pool(workers) => self.probe_pool(tools, workers, &mut sink),
        }

        report.statuses.sort_by(|a, b| a.tool.cmp(&b.tool));
        self.cache.persist()?;
        Ok(report)
    }

    /// Probe `tools` on a bounded pool of scoped workers.
    ///
    /// Workers pull from a shared queue and send results back over a
    /// channel; `sink` runs only on the calling thread.
    fn probe_pool(
        &self,
        tools: Vec<&ToolDescriptor>,
        workers: usize,
        sink: &mut dyn FnMut(ToolStatus),
    ) {
        let workers = workers.clamp(1, tools.len().max(1));
        let queue = Mutex::new(tools.into_iter());
        let (tx, rx) = mpsc::channel::<ToolStatus>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let queue = &queue;
                scope.spawn(move || loop {
                    let next = queue
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .next();
                    let Some(tool) = next else {
                        break;
                    };
                    if tx.send(self.probe(tool)).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            for status in rx {
                sink(status);
            }
        });
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cache::default_ttl;
    use crate::detection::CandidateSource;
    use crate::registry::Category;
    use crate::version::Version;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &TempDir, name: &str, output: &str) {
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\necho \"{}\"\n", output)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::from_descriptors(vec![
                ToolDescriptor::new("fd", Category::Enhanced).with_executables(["fd", "fdfind"]),
                ToolDescriptor::new("probe", Category::Enhanced)
                    .with_min_version(Version::new(2, 0, 0)),
                ToolDescriptor::new("mute", Category::Core),
                ToolDescriptor::new("absent", Category::Core),
            ])
            .unwrap(),
        )
    }

    fn fake_path() -> TempDir {
        let dir = TempDir::new().unwrap();
        script(&dir, "fdfind", "fdfind 8.7.0");
        script(&dir, "probe", "probe version 1.9.9");
        script(&dir, "mute", "no version here");
        dir
    }

    fn engine(dir: &TempDir, cache: Arc<StatusCache>) -> DetectionEngine {
        DetectionEngine::new(registry(), cache).with_path(vec![dir.path().to_path_buf()])
    }

    #[test]
    fn probe_classifies_each_tool() {
        let dir = fake_path();
        let engine = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())));
        let report = engine.detect_all(BatchMode::Sequential).unwrap();

        let by_name = |n: &str| report.statuses.iter().find(|s| s.tool == n).unwrap();
        assert_eq!(by_name("fd").status, StatusKind::Installed);
        assert_eq!(by_name("fd").version, Some(Version::new(8, 7, 0)));
        assert!(by_name("fd").path.as_ref().unwrap().ends_with("fdfind"));
        assert_eq!(by_name("probe").status, StatusKind::Incompatible);
        assert_eq!(by_name("mute").status, StatusKind::Installed);
        assert_eq!(by_name("mute").version, None);
        assert_eq!(by_name("absent").status, StatusKind::NotInstalled);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn first_resolvable_executable_wins() {
        let dir = fake_path();
        script(&dir, "fd", "fd 9.0.0");
        let engine = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())));

        let status = engine.detect("fd").unwrap();
        assert_eq!(status.version, Some(Version::new(9, 0, 0)));
    }

    #[test]
    fn pool_and_sequential_agree() {
        let dir = fake_path();
        let project = |report: &DetectionReport| {
            report
                .statuses
                .iter()
                .map(|s| (s.tool.clone(), s.status, s.version, s.path.clone()))
                .collect::<Vec<_>>()
        };

        let single = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())))
            .detect_all(BatchMode::Pool(1))
            .unwrap();
        let many = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())))
            .detect_all(BatchMode::Pool(8))
            .unwrap();
        let sequential = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())))
            .detect_all(BatchMode::Sequential)
            .unwrap();

        assert_eq!(project(&single), project(&many));
        assert_eq!(project(&single), project(&sequential));
        assert_eq!(single.statuses.len(), 4);
    }

    #[test]
    fn batch_writes_every_tool_to_cache() {
        let dir = fake_path();
        let cache = Arc::new(StatusCache::in_memory(default_ttl()));
        let engine = engine(&dir, Arc::clone(&cache));

        let mut seen = 0;
        engine
            .detect_many(
                &["fd".to_string(), "absent".to_string()],
                BatchMode::Pool(2),
                &mut |_| seen += 1,
            )
            .unwrap();

        assert_eq!(seen, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn unknown_tools_are_isolated_failures() {
        let dir = fake_path();
        let engine = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())));
        let report = engine
            .detect_many(
                &["nope".to_string(), "fd".to_string()],
                BatchMode::Sequential,
                &mut |_| {},
            )
            .unwrap();

        assert_eq!(report.statuses.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].1,
            ToolsenseError::ToolNotInRegistry { .. }
        ));
    }

    #[test]
    fn status_uses_fresh_cache_and_refreshes_stale() {
        let dir = fake_path();
        let cache = Arc::new(StatusCache::in_memory(default_ttl()));
        let engine = engine(&dir, Arc::clone(&cache));

        let planted = ToolStatus::not_installed("fd", Utc::now());
        cache.put(planted.clone());
        assert_eq!(engine.status("fd").unwrap(), planted);

        let old = Utc::now() - chrono::Duration::days(2);
        cache.put(ToolStatus::not_installed("fd", old));
        assert_eq!(engine.status("fd").unwrap().status, StatusKind::Installed);
    }

    #[test]
    fn refresh_stale_skips_fresh_entries() {
        let dir = fake_path();
        let cache = Arc::new(StatusCache::in_memory(default_ttl()));
        let engine = engine(&dir, Arc::clone(&cache));

        cache.put(ToolStatus::not_installed("fd", Utc::now()));
        let report = engine.refresh_stale(BatchMode::Sequential).unwrap();

        assert_eq!(report.statuses.len(), 3);
        assert!(report.statuses.iter().all(|s| s.tool != "fd"));
        assert_eq!(cache.get("fd").unwrap().status, StatusKind::NotInstalled);
    }

    struct Newer(Version);

    impl CandidateSource for Newer {
        fn candidate_version(
            &self,
            _: &ToolDescriptor,
            _: Option<InstallMethod>,
        ) -> Option<Version> {
            Some(self.0)
        }
    }

    #[test]
    fn newer_candidate_marks_outdated() {
        let dir = fake_path();
        let engine = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())))
            .with_candidates(Box::new(Newer(Version::new(10, 0, 0))));

        assert_eq!(engine.detect("fd").unwrap().status, StatusKind::Outdated);
        // Incompatible wins over outdated.
        assert_eq!(engine.detect("probe").unwrap().status, StatusKind::Incompatible);
        // Unknown version cannot be outdated.
        assert_eq!(engine.detect("mute").unwrap().status, StatusKind::Installed);
    }

    #[test]
    fn detect_unknown_tool_fails() {
        let dir = fake_path();
        let engine = engine(&dir, Arc::new(StatusCache::in_memory(default_ttl())));
        assert!(matches!(
            engine.detect("nope").unwrap_err(),
            ToolsenseError::ToolNotInRegistry { .. }
        ));
    }
}
