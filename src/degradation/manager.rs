//! Degradation state derived from the status cache.

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeSet;

use super::fallback::{CapabilityBackend, Fallback, Plan, Request, ToolBackend, WATCH_LIST};
use super::mode::{CategoryCounts, DegradationMode};
use crate::cache::StatusCache;
use crate::capability::{CapabilityResolver, LiveEnvironment};
use crate::registry::{Category, ToolRegistry};

/// Current degradation picture. Always recomputed, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradationState {
    pub mode: DegradationMode,
    pub core: CategoryCounts,
    pub enhanced: CategoryCounts,
    /// Watched capabilities with no available tool.
    pub missing: BTreeSet<String>,
    /// Fallbacks standing in for missing capabilities.
    pub active_fallbacks: BTreeSet<String>,
}

/// Computes degradation from registry categories and cached statuses.
pub struct DegradationManager<'a> {
    registry: &'a ToolRegistry,
    cache: &'a StatusCache,
    env: &'a dyn LiveEnvironment,
}

impl<'a> DegradationManager<'a> {
    pub fn new(
        registry: &'a ToolRegistry,
        cache: &'a StatusCache,
        env: &'a dyn LiveEnvironment,
    ) -> Self {
        Self {
            registry,
            cache,
            env,
        }
    }

    fn resolver(&self) -> CapabilityResolver<'a> {
        CapabilityResolver::new(self.registry, self.cache, self.env)
    }

    /// Installed/total counts for a category from the current cache.
    ///
    /// Tools with no cache entry, or only a stale one, count as not installed.
    pub fn counts(&self, category: Category) -> CategoryCounts {
        let snapshot = self.cache.snapshot();
        let (ttl, now) = (self.cache.ttl(), Utc::now());
        let mut counts = CategoryCounts::default();
        for tool in self.registry.by_category(category) {
            counts.total += 1;
            if snapshot
                .get(&tool.name)
                .is_some_and(|s| s.is_fresh(ttl, now) && s.status.counts_as_installed())
            {
                counts.installed += 1;
            }
        }
        counts
    }

    /// The mode for the current cache contents.
    pub fn mode(&self) -> DegradationMode {
        DegradationMode::from_counts(self.counts(Category::Core), self.counts(Category::Enhanced))
    }

    /// Watched capabilities that no tool can currently provide.
    pub fn missing_capabilities(&self) -> BTreeSet<String> {
        let resolver = self.resolver();
        WATCH_LIST
            .iter()
            .filter(|cap| !resolver.is_capability_available(cap))
            .map(|cap| cap.to_string())
            .collect()
    }

    /// Full degradation state.
    pub fn state(&self) -> DegradationState {
        let core = self.counts(Category::Core);
        let enhanced = self.counts(Category::Enhanced);
        let missing = self.missing_capabilities();
        let active_fallbacks = missing
            .iter()
            .filter_map(|cap| Fallback::for_capability(cap))
            .map(|f| f.as_str().to_string())
            .collect();

        let state = DegradationState {
            mode: DegradationMode::from_counts(core, enhanced),
            core,
            enhanced,
            missing,
            active_fallbacks,
        };
        tracing::debug!(
            "Degradation mode {} (core {}, enhanced {}), {} fallbacks active",
            state.mode,
            state.core,
            state.enhanced,
            state.active_fallbacks.len()
        );
        state
    }

    /// The backend to use for `capability`.
    ///
    /// The best available tool wins; the fallback is used only when no tool
    /// is available. `None` for capabilities with neither.
    pub fn backend_for(&self, capability: &str) -> Option<Box<dyn CapabilityBackend>> {
        if let Some(tool) = self.resolver().best(capability) {
            if let Some(path) = self.fresh_path(&tool.name) {
                return Some(Box::new(ToolBackend::new(&tool.name, path)));
            }
        }
        Fallback::for_capability(capability).map(|f| Box::new(f) as Box<dyn CapabilityBackend>)
    }

    /// Plan a request with the best backend that can serve it.
    pub fn plan(&self, request: &Request<'_>) -> Option<Plan> {
        let capability = request.capability();
        let resolver = self.resolver();
        let primary = resolver.resolve(capability).into_iter().find_map(|tool| {
            let path = self.fresh_path(&tool.name)?;
            ToolBackend::new(&tool.name, path).plan(request)
        });
        primary.or_else(|| Fallback::for_capability(capability)?.plan(request))
    }

    fn fresh_path(&self, tool: &str) -> Option<std::path::PathBuf> {
        self.cache.get_fresh(tool, Utc::now())?.path
    }
}
