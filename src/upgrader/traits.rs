//! Capability traits consumed by the upgrade core.
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::{
    analyzer::types::AnalyzedProject, error::Result,
    upgrader::types::ConsolidatedPackage,
};

/// Applies a single version bump to one project manifest. The edit itself
/// is an external concern; the core only sees success or failure detail.
#[cfg_attr(test, automock)]
pub trait PackageUpgrader: Send + Sync {
    fn apply_upgrade(
        &self,
        manifest_path: &Path,
        package: &str,
        version: &str,
        centrally_managed: bool,
    ) -> Result<()>;
}

/// Synchronous yes/no confirmation supplied by the caller, used in Prompt
/// mode before each candidate is applied.
#[cfg_attr(test, automock)]
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, package: &ConsolidatedPackage) -> bool;
}

/// Progress and outcome reporting injected into the orchestration so the
/// core stays testable without console capture.
#[cfg_attr(test, automock)]
pub trait Reporter: Send + Sync {
    /// Free-form progress note.
    fn note(&self, message: &str);

    /// Render the outdated findings before selection begins.
    fn outdated_projects(&self, projects: &[AnalyzedProject]);

    /// A candidate was suppressed because an open branch already proposes it.
    fn existing_branch_skip(&self, package: &str, version: &str);

    /// One project reference was upgraded successfully.
    fn upgrade_applied(&self, package: &str, project: &str);

    /// One project reference failed to upgrade.
    fn upgrade_failed(&self, package: &str, project: &str, detail: &str);
}
