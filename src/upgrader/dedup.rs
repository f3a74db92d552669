//! Suppresses upgrade candidates already represented by an open upgrade
//! branch on the remote.

use regex::Regex;

use crate::{
    error::Result,
    upgrader::{
        UPGRADE_BRANCH_PREFIX, traits::Reporter, types::ConsolidatedPackage,
    },
};

/// A remote branch following this tool's naming convention, parsed back
/// into whatever upgrade information its name still carries.
///
/// Single-package branches recover their (package, version) pair.
/// Multi-package branch names only carry a one-way hash, so nothing is
/// recoverable from them; functionally identical multi-package content may
/// therefore be re-proposed under a previous hash. Accepted limitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingBranch {
    /// Branch name as listed on the remote.
    pub name: String,
    /// Recovered (package, version) for single-package branches.
    pub upgraded_package: Option<(String, String)>,
}

impl ExistingBranch {
    /// Parse a remote branch name. Returns None for branches that do not
    /// follow this tool's naming convention.
    pub fn parse(branch_name: &str) -> Result<Option<Self>> {
        let marker = format!("{UPGRADE_BRANCH_PREFIX}/");
        if !branch_name.contains(&marker) {
            return Ok(None);
        }

        // Greedy package match: the version is whatever follows the last
        // underscore, so package names containing the separator keep their
        // inner underscores.
        let single = Regex::new(&format!(
            r"{UPGRADE_BRANCH_PREFIX}/upgrade_(?<package>.*)_(?<version>.*)"
        ))?;

        let upgraded_package = single.captures(branch_name).map(|captures| {
            (
                captures["package"].to_string(),
                captures["version"].to_string(),
            )
        });

        Ok(Some(Self {
            name: branch_name.to_string(),
            upgraded_package,
        }))
    }

    /// Parse a remote branch listing, keeping only branches that follow
    /// this tool's naming convention.
    pub fn from_branch_names(names: &[String]) -> Result<Vec<Self>> {
        let mut branches = vec![];
        for name in names {
            if let Some(branch) = Self::parse(name)? {
                branches.push(branch);
            }
        }
        Ok(branches)
    }

    fn matches(&self, candidate: &ConsolidatedPackage) -> bool {
        self.upgraded_package.as_ref().is_some_and(|(name, version)| {
            *name == candidate.name && *version == candidate.latest_version
        })
    }
}

/// Remove candidates already represented by an open upgrade branch,
/// preserving the relative order of the rest.
pub fn filter_already_proposed(
    candidates: Vec<ConsolidatedPackage>,
    existing: &[ExistingBranch],
    reporter: &dyn Reporter,
) -> Vec<ConsolidatedPackage> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let already_proposed =
                existing.iter().any(|branch| branch.matches(candidate));
            if already_proposed {
                reporter.existing_branch_skip(
                    &candidate.name,
                    &candidate.latest_version,
                );
            }
            !already_proposed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::types::UpgradeSeverity, upgrader::traits::MockReporter,
    };

    fn candidate(name: &str, latest: &str) -> ConsolidatedPackage {
        ConsolidatedPackage {
            name: name.into(),
            resolved_version: "1.0.0".into(),
            latest_version: latest.into(),
            centrally_managed: false,
            severity: UpgradeSeverity::Minor,
            projects: vec![],
        }
    }

    #[test]
    fn recovers_single_package_branch() {
        let branch =
            ExistingBranch::parse("origin/neukeeper/upgrade_Pkg_1.1.0")
                .unwrap()
                .unwrap();

        assert_eq!(
            branch.upgraded_package,
            Some(("Pkg".into(), "1.1.0".into()))
        );
    }

    #[test]
    fn single_package_branch_round_trips() {
        let details = crate::upgrader::pr_details::build(
            &crate::upgrader::types::UpgradeResult {
                success: true,
                upgraded_packages: vec![{
                    let mut c = candidate("Foo", "1.2.3");
                    c.projects.push(
                        crate::upgrader::types::PackageProjectReference {
                            project: "App".into(),
                            manifest_path: "App.csproj".into(),
                            framework: "net8.0".into(),
                        },
                    );
                    c
                }],
                upgraded_projects: vec![],
            },
        );

        let branch = ExistingBranch::parse(&details.branch_name)
            .unwrap()
            .unwrap();

        assert_eq!(
            branch.upgraded_package,
            Some(("Foo".into(), "1.2.3".into()))
        );
    }

    #[test]
    fn package_names_keep_inner_underscores() {
        let branch =
            ExistingBranch::parse("neukeeper/upgrade_My_Pkg_2.0.0")
                .unwrap()
                .unwrap();

        assert_eq!(
            branch.upgraded_package,
            Some(("My_Pkg".into(), "2.0.0".into()))
        );
    }

    #[test]
    fn multi_package_branch_recovers_nothing() {
        let branch = ExistingBranch::parse("origin/neukeeper/3_upgrades_42")
            .unwrap()
            .unwrap();

        assert!(branch.upgraded_package.is_none());
    }

    #[test]
    fn unrelated_branches_are_ignored() {
        assert!(
            ExistingBranch::parse("origin/feature/add-login")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn excludes_exact_name_and_version_match_only() {
        let existing = ExistingBranch::from_branch_names(&[
            "origin/neukeeper/upgrade_Pkg_1.1.0".to_string(),
        ])
        .unwrap();

        let mut reporter = MockReporter::new();
        reporter
            .expect_existing_branch_skip()
            .withf(|name, version| name == "Pkg" && version == "1.1.0")
            .times(1)
            .return_const(());

        let remaining = filter_already_proposed(
            vec![candidate("Pkg", "1.1.0"), candidate("Pkg", "1.2.0")],
            &existing,
            &reporter,
        );

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].latest_version, "1.2.0");
    }

    #[test]
    fn preserves_relative_candidate_order() {
        let existing = ExistingBranch::from_branch_names(&[
            "origin/neukeeper/upgrade_PkgB_2.1.0".to_string(),
        ])
        .unwrap();

        let mut reporter = MockReporter::new();
        reporter.expect_existing_branch_skip().return_const(());

        let remaining = filter_already_proposed(
            vec![
                candidate("PkgA", "1.1.0"),
                candidate("PkgB", "2.1.0"),
                candidate("PkgC", "3.1.0"),
            ],
            &existing,
            &reporter,
        );

        let names: Vec<&str> =
            remaining.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["PkgA", "PkgC"]);
    }
}
