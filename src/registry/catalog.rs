//! Built-in tool catalog embedded at compile time.

use include_dir::{include_dir, Dir};

use super::descriptor::{Category, ToolDescriptor};
use crate::error::{Result, ToolsenseError};

/// Embedded catalog directory, one YAML file per category.
static CATALOG_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/catalog");

/// Load every descriptor from the embedded catalog.
///
/// The category of each descriptor is taken from its file name
/// (`core.yml` ⇒ [`Category::Core`]).
pub fn load_builtin() -> Result<Vec<ToolDescriptor>> {
    let mut tools = Vec::new();

    for category in Category::ALL {
        let file_name = format!("{}.yml", category.as_str());
        let Some(file) = CATALOG_DIR.get_file(&file_name) else {
            tracing::debug!("No built-in catalog file for category {}", category);
            continue;
        };

        let content = file
            .contents_utf8()
            .ok_or_else(|| ToolsenseError::RegistryLoad {
                source_name: format!("catalog/{}", file_name),
                message: "Invalid UTF-8".to_string(),
            })?;

        tools.extend(parse_catalog(
            &format!("catalog/{}", file_name),
            content,
            Some(category),
        )?);
    }

    Ok(tools)
}

/// Parse a YAML list of descriptors.
///
/// When `category` is given it overrides whatever the rows declare.
pub fn parse_catalog(
    source_name: &str,
    content: &str,
    category: Option<Category>,
) -> Result<Vec<ToolDescriptor>> {
    let mut tools: Vec<ToolDescriptor> =
        serde_yaml::from_str(content).map_err(|e| ToolsenseError::RegistryLoad {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    if let Some(category) = category {
        for tool in &mut tools {
            tool.category = category;
        }
    }

    Ok(tools)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let tools = load_builtin().unwrap();
        assert!(tools.len() >= 20);
        assert!(tools.iter().all(|t| t.validate().is_ok()));
    }

    #[test]
    fn builtin_categories_come_from_file_names() {
        let tools = load_builtin().unwrap();
        let jq = tools.iter().find(|t| t.name == "jq").unwrap();
        assert_eq!(jq.category, Category::Core);
        let fd = tools.iter().find(|t| t.name == "fd").unwrap();
        assert_eq!(fd.category, Category::Enhanced);
    }

    #[test]
    fn parse_catalog_overrides_category() {
        let yaml = "- name: a\n  executables: [a]\n  category: core\n";
        let tools = parse_catalog("test", yaml, Some(Category::System)).unwrap();
        assert_eq!(tools[0].category, Category::System);
    }

    #[test]
    fn parse_catalog_keeps_declared_category_without_override() {
        let yaml = "- name: a\n  executables: [a]\n  category: core\n";
        let tools = parse_catalog("test", yaml, None).unwrap();
        assert_eq!(tools[0].category, Category::Core);
    }

    #[test]
    fn parse_catalog_reports_source_on_error() {
        let err = parse_catalog("overlay.yml", "- name: [unclosed", None).unwrap_err();
        assert!(err.to_string().contains("overlay.yml"));
        assert!(err.is_fatal());
    }
}
