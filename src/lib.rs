//! Toolsense - optional command-line tool detection, installation, and
//! graceful degradation.
//!
//! A [`registry`] of known tools is probed on PATH by the [`detection`]
//! engine, with results kept in a TTL-bounded status [`cache`]. The
//! [`capability`] resolver maps functional needs to tools that can serve
//! them now, [`install`] fills gaps through the host's package managers, and
//! [`degradation`] classifies how much optional functionality is available
//! and which fallbacks stand in for missing tools.
//!
//! # Modules
//!
//! - [`cache`] - Tool statuses and the JSONL status cache
//! - [`capability`] - Capability predicates and resolution
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading and environment overrides
//! - [`degradation`] - Degradation modes and fallback backends
//! - [`detection`] - PATH probing, sequential or on a worker pool
//! - [`error`] - Error types and result aliases
//! - [`install`] - Package managers, the install orchestrator, and its log
//! - [`registry`] - Tool descriptors and the embedded catalog
//! - [`shell`] - Process execution with timeouts
//! - [`toolbox`] - Facade wiring everything together
//! - [`ui`] - Terminal output and prompts
//! - [`version`] - Versions, range operators, and version probing
//!
//! # Example
//!
//! ```
//! use toolsense::version::compare;
//!
//! assert!(compare("1.4.2", "~", "1.4.0").unwrap());
//! assert!(!compare("2.0.0", "^", "1.4.0").unwrap());
//! ```

pub mod cache;
pub mod capability;
pub mod cli;
pub mod config;
pub mod degradation;
pub mod detection;
pub mod error;
pub mod install;
pub mod registry;
pub mod shell;
pub mod toolbox;
pub mod ui;
pub mod version;

pub use error::{Result, ToolsenseError};
pub use toolbox::Toolbox;
