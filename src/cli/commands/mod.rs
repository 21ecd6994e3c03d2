//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. Commands borrow a shared [`Toolbox`] opened once
//! per process.
//!
//! [`Toolbox`]: crate::toolbox::Toolbox

pub mod can_install;
pub mod completions;
pub mod detect;
pub mod dispatcher;
pub mod history;
pub mod install;
pub mod mode;
pub mod resolve;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

#[cfg(all(test, unix))]
pub(crate) mod test_support {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::cache::StatusCache;
    use crate::capability::{names, StaticEnvironment};
    use crate::config::Settings;
    use crate::install::PackageManager;
    use crate::registry::{Category, ToolDescriptor, ToolRegistry};
    use crate::toolbox::Toolbox;

    pub fn fake_tool(dir: &Path, name: &str, output: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\necho '{}'\n", output)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// A toolbox over a small registry with `git` and `fd` on a private PATH.
    pub fn toolbox(temp: &TempDir) -> Toolbox {
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fake_tool(&bin, "git", "git version 2.43.0");
        fake_tool(&bin, "fd", "fd 9.0.0");

        let registry = ToolRegistry::from_descriptors(vec![
            ToolDescriptor::new("git", Category::Core).with_package(PackageManager::Apt, "git"),
            ToolDescriptor::new("fd", Category::Enhanced)
                .with_package(PackageManager::Apt, "fd-find")
                .with_capability(names::ADVANCED_SEARCH),
            ToolDescriptor::new("ncdu", Category::Enhanced)
                .with_package(PackageManager::Apt, "ncdu")
                .with_capability(names::STORAGE_ANALYSIS),
            ToolDescriptor::new("nothing", Category::Optional),
        ])
        .unwrap();

        let settings = Settings {
            cache_path: Some(temp.path().join("status.jsonl")),
            log_path: Some(temp.path().join("install.log")),
            ..Default::default()
        };
        let cache = StatusCache::load(settings.cache_path(), settings.cache_ttl()).unwrap();
        Toolbox::from_parts(settings, registry, cache)
            .with_path(vec![bin])
            .with_environment(Box::new(StaticEnvironment::new()))
    }
}
