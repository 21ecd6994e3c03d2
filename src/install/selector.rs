//! Package manager selection.

use std::collections::BTreeSet;

use super::{PackageManager, Privilege};
use crate::error::{Result, ToolsenseError};
use crate::registry::ToolDescriptor;

/// Inputs to manager selection for one tool.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// Manager requested by the user, if any.
    pub forced: Option<PackageManager>,
    /// Preference order from configuration.
    pub preferred: &'a [PackageManager],
    /// Managers present on this host.
    pub present: &'a BTreeSet<PackageManager>,
    /// Decides which scopes may run.
    pub privilege: Privilege,
}

impl Selection<'_> {
    /// Pick a manager for `tool`.
    ///
    /// Order: the forced manager if it is usable; then the preference
    /// list; then any usable manager. Usable means present, declaring the
    /// tool, and runnable under the current privilege.
    ///
    /// When candidates exist but all need privileges we lack, the result is
    /// `PermissionDenied` for the first of them.
    pub fn select(&self, tool: &ToolDescriptor) -> Result<PackageManager> {
        let candidate =
            |m: PackageManager| self.present.contains(&m) && tool.package_for(m).is_some();
        let usable = |m: PackageManager| candidate(m) && self.privilege.permits(m.scope());

        if let Some(forced) = self.forced {
            if usable(forced) {
                return Ok(forced);
            }
            tracing::warn!(
                "Forced manager {} cannot install '{}'; falling back to preferences",
                forced,
                tool.name
            );
        }

        if let Some(m) = self.preferred.iter().copied().find(|m| usable(*m)) {
            return Ok(m);
        }

        if let Some(m) = PackageManager::ALL.into_iter().find(|m| usable(*m)) {
            return Ok(m);
        }

        let blocked = self
            .preferred
            .iter()
            .copied()
            .chain(PackageManager::ALL)
            .find(|m| candidate(*m));
        if let Some(manager) = blocked {
            return Err(ToolsenseError::PermissionDenied {
                tool: tool.name.clone(),
                manager: manager.to_string(),
            });
        }

        Err(ToolsenseError::NoSuitableManager {
            tool: tool.name.clone(),
            reason: self.explain(tool),
        })
    }

    fn explain(&self, tool: &ToolDescriptor) -> String {
        if tool.packages.is_empty() {
            return "no package mapping for any package manager".to_string();
        }
        let declared: Vec<String> = tool.packages.keys().map(|m| m.to_string()).collect();
        format!(
            "packaged for {} but none of them is installed",
            declared.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Category;

    fn fd() -> ToolDescriptor {
        ToolDescriptor::new("fd", Category::Enhanced)
            .with_package(PackageManager::Apt, "fd-find")
            .with_package(PackageManager::Cargo, "fd-find")
            .with_package(PackageManager::Brew, "fd")
    }

    fn present(managers: &[PackageManager]) -> BTreeSet<PackageManager> {
        managers.iter().copied().collect()
    }

    #[test]
    fn forced_manager_wins() {
        let present = present(&[PackageManager::Apt, PackageManager::Cargo]);
        let selection = Selection {
            forced: Some(PackageManager::Cargo),
            preferred: &[PackageManager::Apt],
            present: &present,
            privilege: Privilege::Root,
        };
        assert_eq!(selection.select(&fd()).unwrap(), PackageManager::Cargo);
    }

    #[test]
    fn forced_manager_without_mapping_falls_through() {
        let present = present(&[PackageManager::Apt, PackageManager::Snap]);
        let selection = Selection {
            forced: Some(PackageManager::Snap),
            preferred: &[PackageManager::Apt],
            present: &present,
            privilege: Privilege::Root,
        };
        assert_eq!(selection.select(&fd()).unwrap(), PackageManager::Apt);
    }

    #[test]
    fn preference_order_is_respected() {
        let present = present(&[PackageManager::Apt, PackageManager::Brew]);
        let selection = Selection {
            forced: None,
            preferred: &[PackageManager::Brew, PackageManager::Apt],
            present: &present,
            privilege: Privilege::Root,
        };
        assert_eq!(selection.select(&fd()).unwrap(), PackageManager::Brew);
    }

    #[test]
    fn any_present_manager_as_last_resort() {
        let present = present(&[PackageManager::Cargo]);
        let selection = Selection {
            forced: None,
            preferred: &[PackageManager::Apt],
            present: &present,
            privilege: Privilege::Root,
        };
        assert_eq!(selection.select(&fd()).unwrap(), PackageManager::Cargo);
    }

    #[test]
    fn unprivileged_skips_system_managers() {
        let present = present(&[PackageManager::Apt, PackageManager::Cargo]);
        let selection = Selection {
            forced: Some(PackageManager::Apt),
            preferred: &[PackageManager::Apt, PackageManager::Cargo],
            present: &present,
            privilege: Privilege::Unprivileged,
        };
        assert_eq!(selection.select(&fd()).unwrap(), PackageManager::Cargo);

        let sudo = Selection {
            privilege: Privilege::Sudo,
            ..selection
        };
        assert_eq!(sudo.select(&fd()).unwrap(), PackageManager::Apt);
    }

    #[test]
    fn only_system_candidates_without_privilege_is_denied() {
        let present = present(&[PackageManager::Apt, PackageManager::Snap]);
        let selection = Selection {
            forced: None,
            preferred: &[PackageManager::Apt],
            present: &present,
            privilege: Privilege::Unprivileged,
        };
        match selection.select(&fd()).unwrap_err() {
            ToolsenseError::PermissionDenied { tool, manager } => {
                assert_eq!(tool, "fd");
                assert_eq!(manager, "apt");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_mapping_is_no_suitable_manager() {
        let present = present(&PackageManager::ALL);
        let selection = Selection {
            forced: None,
            preferred: &[],
            present: &present,
            privilege: Privilege::Root,
        };
        let err = selection
            .select(&ToolDescriptor::new("orphan", Category::Optional))
            .unwrap_err();
        assert!(matches!(err, ToolsenseError::NoSuitableManager { .. }));
        assert!(err.to_string().contains("no package mapping"));
    }

    #[test]
    fn mapped_but_absent_explains() {
        let present = present(&[PackageManager::Snap]);
        let selection = Selection {
            forced: None,
            preferred: &[],
            present: &present,
            privilege: Privilege::Root,
        };
        let err = selection.select(&fd()).unwrap_err();
        assert!(err.to_string().contains("apt, brew, cargo"));
    }
}
