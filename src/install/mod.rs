//! Tool installation.
//!
//! # Modules
//!
//! - [`manager`] - Package managers, their invocations, and privilege escalation
//! - [`selector`] - Choosing a manager for a tool
//! - [`record`] - Installation records and their log-line format
//! - [`log`] - The append-only installation log
//! - [`backup`] - Pre-install state snapshots
//! - [`orchestrator`] - Preconditions, execution, verification, and rollback

pub mod backup;
pub mod log;
pub mod manager;
pub mod orchestrator;
pub mod record;
pub mod selector;

pub use log::{default_log_path, InstallLog};
pub use manager::{detect_present, PackageManager, Privilege, Scope};
pub use orchestrator::{
    default_context, BatchInstallReport, InstallOptions, InstallPlan, InstallRequest,
    InstallerContext, Orchestrator,
};
pub use record::{InstallOutcome, InstallationRecord};
pub use selector::Selection;
