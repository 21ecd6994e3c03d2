//! Settings loading.
//!
//! - [`schema`] - The [`Settings`] struct and derived runtime options
//! - [`loader`] - File discovery, YAML parsing, and `TOOLSENSE_*` overrides

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, default_config_path, load_settings, load_settings_file, parse_settings,
};
pub use schema::Settings;
