//! Tool descriptor and category types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::install::PackageManager;
use crate::version::Version;

/// Maximum descriptor priority.
pub const MAX_PRIORITY: u8 = 100;

/// Functional category of a tool.
///
/// Only [`Category::Core`] and [`Category::Enhanced`] feed the degradation
/// ratios; the rest are informational.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Enhanced,
    Development,
    System,
    #[default]
    Optional,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Core,
        Category::Enhanced,
        Category::Development,
        Category::System,
        Category::Optional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Enhanced => "enhanced",
            Category::Development => "development",
            Category::System => "system",
            Category::Optional => "optional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Immutable description of one optional tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Identity name (e.g., "fd").
    pub name: String,

    /// Candidate executable names, tried in order (e.g., `fd`, then `fdfind`).
    pub executables: Vec<String>,

    /// Package name per package manager.
    #[serde(default)]
    pub packages: BTreeMap<PackageManager, String>,

    /// Minimum compatible version (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<Version>,

    /// Maximum compatible version (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<Version>,

    /// Capability tags this tool provides.
    #[serde(default)]
    pub capabilities: BTreeSet<String>,

    /// Category; embedded catalog files set this from the file name.
    #[serde(default)]
    pub category: Category,

    /// Install priority, 0-100 (higher first).
    #[serde(default = "default_priority")]
    pub priority: u8,

    /// Human-readable size estimate.
    #[serde(default)]
    pub size: String,

    /// Human-readable benefit summary.
    #[serde(default)]
    pub benefit: String,

    /// Override for the version probe arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_args: Option<Vec<String>>,
}

fn default_priority() -> u8 {
    50
}

impl ToolDescriptor {
    /// Create a descriptor with a single executable of the same name.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        let name = name.into();
        Self {
            executables: vec![name.clone()],
            name,
            packages: BTreeMap::new(),
            min_version: None,
            max_version: None,
            capabilities: BTreeSet::new(),
            category,
            priority: default_priority(),
            size: String::new(),
            benefit: String::new(),
            version_args: None,
        }
    }

    /// Replace the candidate executables.
    pub fn with_executables<I, S>(mut self, executables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executables = executables.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the package name for a manager.
    pub fn with_package(mut self, manager: PackageManager, package: impl Into<String>) -> Self {
        self.packages.insert(manager, package.into());
        self
    }

    /// Add a capability tag.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Set the minimum version.
    pub fn with_min_version(mut self, version: Version) -> Self {
        self.min_version = Some(version);
        self
    }

    /// Set the maximum version.
    pub fn with_max_version(mut self, version: Version) -> Self {
        self.max_version = Some(version);
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Package name for a manager, if declared.
    pub fn package_for(&self, manager: PackageManager) -> Option<&str> {
        self.packages.get(&manager).map(String::as_str)
    }

    /// Whether this tool advertises a capability.
    pub fn provides(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Check structural invariants, returning a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("tool name must not be empty".to_string());
        }
        if self.executables.is_empty() || self.executables.iter().any(|e| e.trim().is_empty()) {
            return Err(format!(
                "tool '{}' must list at least one non-empty executable",
                self.name
            ));
        }
        if self.priority > MAX_PRIORITY {
            return Err(format!(
                "tool '{}' priority {} exceeds {}",
                self.name, self.priority, MAX_PRIORITY
            ));
        }
        if let (Some(min), Some(max)) = (&self.min_version, &self.max_version) {
            if min > max {
                return Err(format!(
                    "tool '{}' min_version {} is greater than max_version {}",
                    self.name, min, max
                ));
            }
        }
        if let Some((manager, _)) = self.packages.iter().find(|(_, pkg)| pkg.trim().is_empty()) {
            return Err(format!(
                "tool '{}' has an empty package name for {}",
                self.name, manager
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Core".parse::<Category>().unwrap(), Category::Core);
        assert_eq!("enhanced".parse::<Category>().unwrap(), Category::Enhanced);
        assert!("extra".parse::<Category>().is_err());
    }

    #[test]
    fn descriptor_deserializes_from_yaml() {
        let yaml = r#"
name: fd
executables: [fd, fdfind]
packages: { apt: fd-find, cargo: fd-find }
min_version: "8.0.0"
capabilities: [advanced-search]
priority: 80
"#;
        let tool: ToolDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tool.executables, vec!["fd", "fdfind"]);
        assert_eq!(tool.package_for(PackageManager::Apt), Some("fd-find"));
        assert_eq!(tool.package_for(PackageManager::Snap), None);
        assert_eq!(tool.min_version, Some(Version::new(8, 0, 0)));
        assert!(tool.provides("advanced-search"));
        assert_eq!(tool.category, Category::Optional);
    }

    #[test]
    fn descriptor_defaults_priority() {
        let tool: ToolDescriptor = serde_yaml::from_str("name: x\nexecutables: [x]").unwrap();
        assert_eq!(tool.priority, 50);
        assert!(tool.packages.is_empty());
    }

    #[test]
    fn validate_rejects_missing_executables() {
        let tool = ToolDescriptor::new("x", Category::Core).with_executables(Vec::<String>::new());
        assert!(tool.validate().unwrap_err().contains("executable"));
    }

    #[test]
    fn validate_rejects_priority_over_100() {
        let tool = ToolDescriptor::new("x", Category::Core).with_priority(101);
        assert!(tool.validate().unwrap_err().contains("priority"));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let tool = ToolDescriptor::new("x", Category::Core)
            .with_min_version(Version::new(2, 0, 0))
            .with_max_version(Version::new(1, 0, 0));
        assert!(tool.validate().unwrap_err().contains("min_version"));
    }

    #[test]
    fn validate_accepts_builder_output() {
        let tool = ToolDescriptor::new("probe", Category::Enhanced)
            .with_package(PackageManager::Apt, "probe")
            .with_capability("advanced-search")
            .with_min_version(Version::new(2, 0, 0));
        assert!(tool.validate().is_ok());
    }
}
