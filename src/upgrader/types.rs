//! Value types owned by a single upgrade run.

use std::path::PathBuf;

use crate::analyzer::types::UpgradeSeverity;

/// One project/framework location where a consolidated package is outdated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageProjectReference {
    /// Project name as reported by the analyzer.
    pub project: String,
    /// Absolute path to the project manifest inside the working copy.
    pub manifest_path: PathBuf,
    /// Target framework the outdated reference was found under.
    pub framework: String,
}

/// One outdated package aggregated across every project and framework that
/// references it. Identity is the package name; the resolved/latest versions
/// are those of the first-seen reference, a documented simplification when
/// projects resolve genuinely different versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedPackage {
    pub name: String,
    pub resolved_version: String,
    pub latest_version: String,
    pub centrally_managed: bool,
    pub severity: UpgradeSeverity,
    /// Every location referencing this package, in traversal order.
    pub projects: Vec<PackageProjectReference>,
}

/// Outcome of one upgrade batch. Built once per run by the selector and
/// consumed by the PR details builder and the branch writer.
#[derive(Debug, Clone)]
pub struct UpgradeResult {
    /// False when at least one apply-upgrade call failed.
    pub success: bool,
    /// Packages with at least one successfully applied reference, in
    /// selection order.
    pub upgraded_packages: Vec<ConsolidatedPackage>,
    /// Every project reference that was actually touched, in application
    /// order. Used to stage exactly the mutated manifests.
    pub upgraded_projects: Vec<PackageProjectReference>,
}

impl UpgradeResult {
    pub fn empty() -> Self {
        Self {
            success: true,
            upgraded_packages: vec![],
            upgraded_projects: vec![],
        }
    }
}

/// Branch name, title, and markdown body for the upgrade pull request.
/// A pure, deterministic function of an [`UpgradeResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrDetails {
    pub branch_name: String,
    pub title: String,
    pub body_markdown: String,
}
