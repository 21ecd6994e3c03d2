//! Semantic versions, range operators, and version probing.
//!
//! # Modules
//!
//! - [`types`] - The [`Version`] triple and its parsing/extraction rules
//! - [`constraint`] - Range operators, [`compare`], and compatibility classification
//! - [`detector`] - Runs a tool's version flag and extracts a [`Version`]

pub mod constraint;
pub mod detector;
pub mod types;

pub use constraint::{check_bounds, compare, Compatibility, Constraint, Operator};
pub use detector::VersionDetector;
pub use types::Version;
