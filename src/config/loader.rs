//! Settings file discovery, parsing, and environment overrides.

use std::path::{Path, PathBuf};

use super::schema::Settings;
use crate::error::{Result, ToolsenseError};
use crate::install::PackageManager;

/// `$XDG_CONFIG_HOME/toolsense/config.yml` or the platform equivalent.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolsense")
        .join("config.yml")
}

/// Load settings from `path`, or from the default location when `None`.
///
/// A missing default file yields defaults; a missing explicit file is an
/// error. Environment overrides are applied on top.
///
/// # Errors
///
/// Returns [`ToolsenseError::ConfigParseError`] for unreadable or invalid
/// YAML and for malformed override values.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => load_settings_file(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                load_settings_file(&path)?
            } else {
                tracing::debug!("No config at {}, using defaults", path.display());
                Settings::default()
            }
        }
    };
    apply_env_overrides(&mut settings, &|key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Read and parse a single settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| ToolsenseError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let settings = parse_settings(&content, path)?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Parse YAML settings content. `path` is used for error messages.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| ToolsenseError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `TOOLSENSE_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    settings: &mut Settings,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup("TOOLSENSE_PARALLEL") {
        settings.parallel_detection = parse_bool("TOOLSENSE_PARALLEL", &value)?;
    }
    if let Some(value) = lookup("TOOLSENSE_MAX_WORKERS") {
        settings.max_workers = parse_number("TOOLSENSE_MAX_WORKERS", &value)?;
    }
    if let Some(value) = lookup("TOOLSENSE_FORCE_MANAGER") {
        settings.forced_manager = if value.trim().is_empty() {
            None
        } else {
            Some(parse_manager("TOOLSENSE_FORCE_MANAGER", &value)?)
        };
    }
    if let Some(value) = lookup("TOOLSENSE_INSTALL_TIMEOUT") {
        settings.install_timeout_secs = parse_number("TOOLSENSE_INSTALL_TIMEOUT", &value)?;
    }
    if let Some(value) = lookup("TOOLSENSE_PREFERRED_MANAGERS") {
        settings.preferred_managers = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_manager("TOOLSENSE_PREFERRED_MANAGERS", s))
            .collect::<Result<_>>()?;
    }
    Ok(())
}

fn env_error(var: &str, message: String) -> ToolsenseError {
    ToolsenseError::ConfigParseError {
        path: PathBuf::from(format!("${}", var)),
        message,
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(env_error(var, format!("expected true or false, got '{}'", other))),
    }
}

fn parse_number<T: std::str::FromStr>(var: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| env_error(var, format!("expected a non-negative integer, got '{}'", value)))
}

fn parse_manager(var: &str, value: &str) -> Result<PackageManager> {
    value
        .trim()
        .parse()
        .map_err(|_| env_error(var, format!("unknown package manager '{}'", value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_partial_yaml() {
        let yaml = "max_workers: 8\npreferred_managers: [brew, cargo]\nforced_manager: cargo\n";
        let settings = parse_settings(yaml, Path::new("config.yml")).unwrap();
        assert_eq!(settings.max_workers, 8);
        assert_eq!(
            settings.preferred_managers,
            vec![PackageManager::Brew, PackageManager::Cargo]
        );
        assert_eq!(settings.forced_manager, Some(PackageManager::Cargo));
        assert!(settings.parallel_detection);
        assert_eq!(settings.install_timeout_secs, 300);
    }

    #[test]
    fn empty_file_is_defaults() {
        let settings = parse_settings("  \n", Path::new("config.yml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_settings("max_workers: [", Path::new("/etc/ts.yml")).unwrap_err();
        match err {
            ToolsenseError::ConfigParseError { path, .. } => {
                assert_eq!(path, PathBuf::from("/etc/ts.yml"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_manager_rejected() {
        assert!(parse_settings("forced_manager: zypper\n", Path::new("c.yml")).is_err());
    }

    #[test]
    fn loads_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "check_outdated: true\ncache_ttl_secs: 60\n").unwrap();

        let settings = load_settings_file(&path).unwrap();
        assert!(settings.check_outdated);
        assert_eq!(settings.cache_ttl_secs, 60);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_settings_file(&temp.path().join("nope.yml")).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut settings = Settings::default();
        let vars = lookup(&[
            ("TOOLSENSE_PARALLEL", "false"),
            ("TOOLSENSE_MAX_WORKERS", "2"),
            ("TOOLSENSE_FORCE_MANAGER", "homebrew"),
            ("TOOLSENSE_INSTALL_TIMEOUT", "30"),
            ("TOOLSENSE_PREFERRED_MANAGERS", "pipx, apt-get ,"),
        ]);
        apply_env_overrides(&mut settings, &vars).unwrap();

        assert!(!settings.parallel_detection);
        assert_eq!(settings.max_workers, 2);
        assert_eq!(settings.forced_manager, Some(PackageManager::Brew));
        assert_eq!(settings.install_timeout_secs, 30);
        assert_eq!(
            settings.preferred_managers,
            vec![PackageManager::Pipx, PackageManager::Apt]
        );
    }

    #[test]
    fn empty_force_manager_clears_it() {
        let mut settings = Settings {
            forced_manager: Some(PackageManager::Snap),
            ..Default::default()
        };
        apply_env_overrides(&mut settings, &lookup(&[("TOOLSENSE_FORCE_MANAGER", "")])).unwrap();
        assert_eq!(settings.forced_manager, None);
    }

    #[test]
    fn bad_env_value_names_the_variable() {
        let mut settings = Settings::default();
        let err = apply_env_overrides(&mut settings, &lookup(&[("TOOLSENSE_MAX_WORKERS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("TOOLSENSE_MAX_WORKERS"));
    }
}
