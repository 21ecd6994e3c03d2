//! The `Toolbox` facade.
//!
//! Wires the registry, status cache, detection engine, install log, and live
//! environment together from [`Settings`]. Everything is owned by the
//! toolbox and handed to collaborators by reference; there is no global state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::StatusCache;
use crate::capability::{CapabilityResolver, LiveEnvironment, SystemEnvironment};
use crate::config::Settings;
use crate::degradation::{CapabilityBackend, DegradationManager, DegradationState, Plan, Request};
use crate::detection::{AptCandidates, DetectionEngine, DetectionReport};
use crate::error::Result;
use crate::install::{
    default_context, InstallLog, InstallPlan, InstallRequest, InstallationRecord,
    InstallerContext, Orchestrator,
};
use crate::registry::{ToolDescriptor, ToolRegistry};
use crate::version::VersionDetector;

/// Everything needed to detect, resolve, and install tools.
pub struct Toolbox {
    registry: Arc<ToolRegistry>,
    cache: Arc<StatusCache>,
    settings: Settings,
    engine: DetectionEngine,
    log: InstallLog,
    env: Box<dyn LiveEnvironment>,
}

impl Toolbox {
    /// Open the built-in registry (plus any overlay) and the on-disk cache.
    ///
    /// # Errors
    ///
    /// Registry load failures are fatal; see [`ToolsenseError::is_fatal`].
    ///
    /// [`ToolsenseError::is_fatal`]: crate::error::ToolsenseError::is_fatal
    pub fn open(settings: Settings) -> Result<Self> {
        let mut registry = ToolRegistry::builtin()?;
        if let Some(overlay) = &settings.registry_overlay {
            registry = registry.with_overlay(overlay)?;
        }
        let cache = StatusCache::load(settings.cache_path(), settings.cache_ttl())?;
        if cache.discarded() > 0 {
            tracing::info!(
                "Discarded {} corrupt cache entries; they will be re-detected",
                cache.discarded()
            );
        }
        Ok(Self::from_parts(settings, registry, cache))
    }

    /// Assemble a toolbox from already-built parts.
    pub fn from_parts(settings: Settings, registry: ToolRegistry, cache: StatusCache) -> Self {
        let registry = Arc::new(registry);
        let cache = Arc::new(cache);
        let mut engine = DetectionEngine::new(Arc::clone(&registry), Arc::clone(&cache))
            .with_detector(VersionDetector::new(settings.version_probe_timeout()));
        if settings.check_outdated {
            engine = engine.with_candidates(Box::new(AptCandidates::new(
                settings.version_probe_timeout(),
            )));
        }
        let log = InstallLog::new(settings.log_path());

        Self {
            registry,
            cache,
            settings,
            engine,
            log,
            env: Box::new(SystemEnvironment),
        }
    }

    /// Replace the live environment consulted by capability predicates.
    pub fn with_environment(mut self, env: Box<dyn LiveEnvironment>) -> Self {
        self.env = env;
        self
    }

    /// Search these directories for executables instead of PATH.
    pub fn with_path(mut self, entries: Vec<PathBuf>) -> Self {
        self.engine = self.engine.with_path(entries);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &DetectionEngine {
        &self.engine
    }

    pub fn install_log(&self) -> &InstallLog {
        &self.log
    }

    fn resolver(&self) -> CapabilityResolver<'_> {
        CapabilityResolver::new(&self.registry, &self.cache, self.env.as_ref())
    }

    /// Re-detect missing or stale tools before answering from the cache.
    ///
    /// Probe results land in memory even when persisting fails.
    fn refresh_before_query(&self) {
        match self.refresh_stale() {
            Ok(report) => {
                for (tool, err) in &report.failures {
                    tracing::warn!("Could not detect '{}': {}", tool, err);
                }
            }
            Err(e) => tracing::warn!("Status refresh incomplete: {}", e),
        }
    }

    /// Tools that provide `capability` right now, highest priority first.
    pub fn resolve(&self, capability: &str) -> Vec<&ToolDescriptor> {
        self.refresh_before_query();
        self.resolver().resolve(capability)
    }

    pub fn is_available(&self, tool: &str, capability: &str) -> bool {
        self.refresh_before_query();
        self.resolver().is_available(tool, capability)
    }

    /// A degradation view over the cache as it stands; no refresh.
    pub fn degradation(&self) -> DegradationManager<'_> {
        DegradationManager::new(&self.registry, &self.cache, self.env.as_ref())
    }

    pub fn degradation_state(&self) -> DegradationState {
        self.refresh_before_query();
        self.degradation().state()
    }

    pub fn backend_for(&self, capability: &str) -> Option<Box<dyn CapabilityBackend>> {
        self.refresh_before_query();
        self.degradation().backend_for(capability)
    }

    /// Plan a capability request with the best available backend.
    pub fn plan(&self, request: &Request<'_>) -> Option<Plan> {
        self.refresh_before_query();
        self.degradation().plan(request)
    }

    /// Detect every registry tool with the configured batch mode.
    pub fn detect_all(&self) -> Result<DetectionReport> {
        self.engine.detect_all(self.settings.batch_mode())
    }

    /// Re-detect tools whose cache entries are missing or stale.
    pub fn refresh_stale(&self) -> Result<DetectionReport> {
        self.engine.refresh_stale(self.settings.batch_mode())
    }

    /// An orchestrator running real commands.
    pub fn orchestrator(&self) -> Orchestrator<'_> {
        self.orchestrator_with(default_context())
    }

    /// An orchestrator with injected command execution and host probes.
    pub fn orchestrator_with<'a>(&'a self, ctx: InstallerContext<'a>) -> Orchestrator<'a> {
        Orchestrator::new(
            &self.engine,
            self.log.clone(),
            self.settings.install_options(),
            ctx,
        )
    }

    pub fn can_install(&self, tool: &str) -> Result<InstallPlan> {
        self.orchestrator().can_install(tool)
    }

    pub fn install(&self, tool: &str, request: InstallRequest) -> Result<InstallationRecord> {
        self.orchestrator().install(tool, request)
    }

    /// Most recent install attempts, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<InstallationRecord>> {
        Ok(self.log.recent(limit)?)
    }
}
