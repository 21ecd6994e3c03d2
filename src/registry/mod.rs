//! Tool registry: the immutable catalog of optional tools.
//!
//! The registry is built once at startup (from the embedded catalog plus an
//! optional user overlay) and then shared read-only, usually behind an
//! [`Arc`](std::sync::Arc). Nothing mutates it after construction.
//!
//! # Example
//!
//! ```
//! use toolsense::registry::{Category, ToolRegistry};
//!
//! let registry = ToolRegistry::builtin().unwrap();
//! assert!(registry.get("fd").is_some());
//! assert!(registry.by_category(Category::Core).count() > 0);
//! ```

pub mod catalog;
pub mod descriptor;

pub use descriptor::{Category, ToolDescriptor, MAX_PRIORITY};

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{Result, ToolsenseError};

/// Catalog of all known tools, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Load the embedded catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_descriptors(catalog::load_builtin()?)
    }

    /// Build a registry from descriptors, validating each one.
    ///
    /// Duplicate names are rejected; use [`ToolRegistry::with_overlay`] to
    /// replace built-in entries deliberately.
    pub fn from_descriptors(descriptors: Vec<ToolDescriptor>) -> Result<Self> {
        let mut tools = BTreeMap::new();
        for descriptor in descriptors {
            descriptor
                .validate()
                .map_err(|message| ToolsenseError::RegistryLoad {
                    source_name: "registry".to_string(),
                    message,
                })?;
            if tools.contains_key(&descriptor.name) {
                return Err(ToolsenseError::RegistryLoad {
                    source_name: "registry".to_string(),
                    message: format!("duplicate tool '{}'", descriptor.name),
                });
            }
            tools.insert(descriptor.name.clone(), descriptor);
        }
        Ok(Self { tools })
    }

    /// Add or replace descriptors from a user YAML file.
    pub fn with_overlay(mut self, path: &Path) -> Result<Self> {
        let source_name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| ToolsenseError::RegistryLoad {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;

        for descriptor in catalog::parse_catalog(&source_name, &content, None)? {
            descriptor
                .validate()
                .map_err(|message| ToolsenseError::RegistryLoad {
                    source_name: source_name.clone(),
                    message,
                })?;
            if self.tools.contains_key(&descriptor.name) {
                tracing::debug!("Overlay replaces built-in tool '{}'", descriptor.name);
            }
            self.tools.insert(descriptor.name.clone(), descriptor);
        }

        Ok(self)
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Look up a tool by name, failing with [`ToolsenseError::ToolNotInRegistry`].
    pub fn require(&self, name: &str) -> Result<&ToolDescriptor> {
        self.get(name).ok_or_else(|| ToolsenseError::ToolNotInRegistry {
            tool: name.to_string(),
        })
    }

    /// Whether the registry knows this tool.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tools in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    /// All tool names in order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tools in a category.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values().filter(move |t| t.category == category)
    }

    /// Tools advertising a capability, highest priority first.
    pub fn with_capability(&self, capability: &str) -> Vec<&ToolDescriptor> {
        let mut tools: Vec<&ToolDescriptor> = self
            .tools
            .values()
            .filter(|t| t.provides(capability))
            .collect();
        tools.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        tools
    }

    /// Every capability tag advertised by at least one tool.
    pub fn capabilities(&self) -> BTreeSet<&str> {
        self.tools
            .values()
            .flat_map(|t| t.capabilities.iter().map(String::as_str))
            .collect()
    }
}
