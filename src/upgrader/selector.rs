//! Selects a bounded batch of candidates and applies their upgrades.

use crate::{
    config::UpgradeMode,
    upgrader::{
        traits::{ConfirmPrompt, PackageUpgrader, Reporter},
        types::{ConsolidatedPackage, UpgradeResult},
    },
};

/// Applies upgrades for a bounded, optionally confirmed batch of
/// candidates. Apply calls run strictly sequentially: sibling manifests may
/// share state, and Prompt mode blocks on the operator anyway.
pub struct UpgradeSelector<'a> {
    upgrader: &'a dyn PackageUpgrader,
    prompt: &'a dyn ConfirmPrompt,
    reporter: &'a dyn Reporter,
}

impl<'a> UpgradeSelector<'a> {
    pub fn new(
        upgrader: &'a dyn PackageUpgrader,
        prompt: &'a dyn ConfirmPrompt,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            upgrader,
            prompt,
            reporter,
        }
    }

    /// Truncate the candidate list to `max_updates`, confirm each candidate
    /// in Prompt mode, then apply every project reference of each confirmed
    /// candidate. Failures are recorded and reported but never abort the
    /// batch or roll anything back: partial application is an accepted
    /// outcome surfaced through the success flag.
    pub fn select_and_apply(
        &self,
        candidates: Vec<ConsolidatedPackage>,
        max_updates: Option<usize>,
        mode: UpgradeMode,
    ) -> UpgradeResult {
        let mut result = UpgradeResult::empty();

        let batch: Vec<ConsolidatedPackage> = match max_updates {
            Some(cap) => candidates.into_iter().take(cap).collect(),
            None => candidates,
        };

        for package in batch {
            if mode == UpgradeMode::Prompt && !self.prompt.confirm(&package) {
                continue;
            }

            self.reporter.note(&format!(
                "Upgrading package {} from {} to {}",
                package.name, package.resolved_version, package.latest_version
            ));

            let mut any_applied = false;

            for reference in &package.projects {
                match self.upgrader.apply_upgrade(
                    &reference.manifest_path,
                    &package.name,
                    &package.latest_version,
                    package.centrally_managed,
                ) {
                    Ok(()) => {
                        self.reporter
                            .upgrade_applied(&package.name, &reference.project);
                        any_applied = true;
                        result.upgraded_projects.push(reference.clone());
                    }
                    Err(err) => {
                        self.reporter.upgrade_failed(
                            &package.name,
                            &reference.project,
                            &err.to_string(),
                        );
                        result.success = false;
                    }
                }
            }

            if any_applied {
                result.upgraded_packages.push(package);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::types::UpgradeSeverity,
        upgrader::{
            traits::{MockConfirmPrompt, MockPackageUpgrader, MockReporter},
            types::PackageProjectReference,
        },
    };
    use crate::error::NeukeeperError;

    fn candidate(name: &str, projects: Vec<&str>) -> ConsolidatedPackage {
        ConsolidatedPackage {
            name: name.into(),
            resolved_version: "1.0.0".into(),
            latest_version: "1.1.0".into(),
            centrally_managed: false,
            severity: UpgradeSeverity::Minor,
            projects: projects
                .into_iter()
                .map(|project| PackageProjectReference {
                    project: project.into(),
                    manifest_path: format!("{project}.csproj").into(),
                    framework: "net8.0".into(),
                })
                .collect(),
        }
    }

    fn quiet_reporter() -> MockReporter {
        let mut reporter = MockReporter::new();
        reporter.expect_note().return_const(());
        reporter.expect_upgrade_applied().return_const(());
        reporter.expect_upgrade_failed().return_const(());
        reporter
    }

    #[test]
    fn caps_the_batch_preserving_order() {
        let applied = std::sync::Arc::new(std::sync::Mutex::new(vec![]));

        let mut upgrader = MockPackageUpgrader::new();
        {
            let applied = std::sync::Arc::clone(&applied);
            upgrader.expect_apply_upgrade().times(2).returning(
                move |_, package, _, _| {
                    applied.lock().unwrap().push(package.to_string());
                    Ok(())
                },
            );
        }
        let prompt = MockConfirmPrompt::new();
        let reporter = quiet_reporter();

        let selector = UpgradeSelector::new(&upgrader, &prompt, &reporter);
        let result = selector.select_and_apply(
            vec![
                candidate("PkgA", vec!["App"]),
                candidate("PkgB", vec!["App"]),
                candidate("PkgC", vec!["App"]),
            ],
            Some(2),
            UpgradeMode::Auto,
        );

        assert_eq!(*applied.lock().unwrap(), vec!["PkgA", "PkgB"]);
        assert!(result.success);
        assert_eq!(result.upgraded_packages.len(), 2);
    }

    #[test]
    fn declined_candidates_contribute_nothing() {
        let mut upgrader = MockPackageUpgrader::new();
        upgrader
            .expect_apply_upgrade()
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let mut prompt = MockConfirmPrompt::new();
        prompt
            .expect_confirm()
            .times(2)
            .returning(|package| package.name == "PkgB");

        let reporter = quiet_reporter();
        let selector = UpgradeSelector::new(&upgrader, &prompt, &reporter);

        let result = selector.select_and_apply(
            vec![candidate("PkgA", vec!["App"]), candidate("PkgB", vec!["App"])],
            None,
            UpgradeMode::Prompt,
        );

        assert!(result.success);
        assert_eq!(result.upgraded_packages.len(), 1);
        assert_eq!(result.upgraded_packages[0].name, "PkgB");
    }

    #[test]
    fn partial_failure_keeps_successful_entries() {
        // second project of PkgA fails, first succeeds
        let mut failing = MockPackageUpgrader::new();
        failing.expect_apply_upgrade().times(2).returning(
            |manifest, _, _, _| {
                if manifest.to_string_lossy().contains("Lib") {
                    Err(NeukeeperError::network("restore failed"))
                } else {
                    Ok(())
                }
            },
        );

        let prompt = MockConfirmPrompt::new();
        let reporter = quiet_reporter();
        let selector = UpgradeSelector::new(&failing, &prompt, &reporter);

        let result = selector.select_and_apply(
            vec![candidate("PkgA", vec!["App", "Lib"])],
            None,
            UpgradeMode::Auto,
        );

        assert!(!result.success);
        assert_eq!(result.upgraded_packages.len(), 1);
        assert_eq!(result.upgraded_projects.len(), 1);
        assert_eq!(result.upgraded_projects[0].project, "App");
    }

    #[test]
    fn failures_do_not_abort_remaining_candidates() {
        let mut upgrader = MockPackageUpgrader::new();
        upgrader.expect_apply_upgrade().times(2).returning(
            |_, package, _, _| {
                if package == "PkgA" {
                    Err(NeukeeperError::network("unreachable feed"))
                } else {
                    Ok(())
                }
            },
        );

        let prompt = MockConfirmPrompt::new();
        let reporter = quiet_reporter();
        let selector = UpgradeSelector::new(&upgrader, &prompt, &reporter);

        let result = selector.select_and_apply(
            vec![candidate("PkgA", vec!["App"]), candidate("PkgB", vec!["App"])],
            None,
            UpgradeMode::Auto,
        );

        assert!(!result.success);
        assert_eq!(result.upgraded_packages.len(), 1);
        assert_eq!(result.upgraded_packages[0].name, "PkgB");
    }

    #[test]
    fn references_are_applied_in_stored_order() {
        let order = std::sync::Arc::new(std::sync::Mutex::new(vec![]));

        let mut upgrader = MockPackageUpgrader::new();
        {
            let order = std::sync::Arc::clone(&order);
            upgrader.expect_apply_upgrade().times(3).returning(
                move |manifest, _, _, _| {
                    order
                        .lock()
                        .unwrap()
                        .push(manifest.to_string_lossy().to_string());
                    Ok(())
                },
            );
        }

        let prompt = MockConfirmPrompt::new();
        let reporter = quiet_reporter();
        let selector = UpgradeSelector::new(&upgrader, &prompt, &reporter);

        selector.select_and_apply(
            vec![candidate("PkgA", vec!["App", "Lib", "Tests"])],
            None,
            UpgradeMode::Auto,
        );

        let order = order.lock().unwrap();
        assert_eq!(
            *order,
            vec!["App.csproj", "Lib.csproj", "Tests.csproj"]
        );
    }
}
