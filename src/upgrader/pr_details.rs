//! Deterministic branch name, title, and body for an upgrade batch.
//!
//! Identical input must yield byte-identical output: branch-name collisions
//! are the dedup mechanism, so nothing here may depend on iteration order
//! of a map, process state, or a randomized hasher.

use std::fmt::Write;

use crate::upgrader::{
    UPGRADE_BRANCH_PREFIX,
    types::{PrDetails, UpgradeResult},
};

const MULTI_UPGRADE_HASH_MODULUS: i32 = 397;

/// Build the PR details for an upgrade batch.
pub fn build(upgrade_result: &UpgradeResult) -> PrDetails {
    let (branch_name, title) = if upgrade_result.upgraded_packages.len() == 1 {
        let package = &upgrade_result.upgraded_packages[0];
        (
            format!(
                "{UPGRADE_BRANCH_PREFIX}/upgrade_{}_{}",
                package.name, package.latest_version
            ),
            format!(
                "Upgrade {} to {}",
                package.name, package.latest_version
            ),
        )
    } else {
        let count = upgrade_result.upgraded_packages.len();
        let hash = upgrade_set_hash(upgrade_result);
        (
            format!("{UPGRADE_BRANCH_PREFIX}/{count}_upgrades_{hash}"),
            format!("Upgrade {count} packages"),
        )
    };

    PrDetails {
        branch_name,
        title,
        body_markdown: build_body(upgrade_result),
    }
}

fn build_body(upgrade_result: &UpgradeResult) -> String {
    let mut body = String::new();

    body.push_str("This upgrades the following packages:\n");
    body.push('\n');
    body.push_str("| Project | Package | Old Version | New Version |\n");
    body.push_str("| - | - | - | - |\n");

    for package in &upgrade_result.upgraded_packages {
        for reference in &package.projects {
            let _ = writeln!(
                body,
                "| {} | {} | {} | {} |",
                reference.project,
                package.name,
                package.resolved_version,
                package.latest_version
            );
        }
    }

    if !upgrade_result.upgraded_packages.is_empty()
        && upgrade_result
            .upgraded_packages
            .iter()
            .all(|package| package.centrally_managed)
    {
        body.push('\n');
        body.push_str("Central package management is used ✔️\n");
    }

    body
}

/// Order-invariant identity for a multi-package batch: the sum of stable
/// string hashes of every package name and project name, reduced to a small
/// positive integer. Deliberately non-cryptographic; distinct upgrade sets
/// can collide.
fn upgrade_set_hash(upgrade_result: &UpgradeResult) -> i32 {
    let mut sum: i32 = 0;

    for package in &upgrade_result.upgraded_packages {
        sum = sum.wrapping_add(stable_hash(&package.name));
        for reference in &package.projects {
            sum = sum.wrapping_add(stable_hash(&reference.project));
        }
    }

    (sum % MULTI_UPGRADE_HASH_MODULUS).abs()
}

/// Fixed FNV-1a over the UTF-8 bytes, reduced to i32. Stable across runs
/// and processes, unlike the standard library's randomized hasher.
fn stable_hash(value: &str) -> i32 {
    const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
    const FNV_PRIME: u32 = 16777619;

    let mut hash = FNV_OFFSET_BASIS;
    for byte in value.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    hash as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::types::UpgradeSeverity,
        upgrader::types::{ConsolidatedPackage, PackageProjectReference},
    };

    fn reference(project: &str) -> PackageProjectReference {
        PackageProjectReference {
            project: project.into(),
            manifest_path: format!("{project}.csproj").into(),
            framework: "net8.0".into(),
        }
    }

    fn package(
        name: &str,
        resolved: &str,
        latest: &str,
        projects: Vec<&str>,
    ) -> ConsolidatedPackage {
        ConsolidatedPackage {
            name: name.into(),
            resolved_version: resolved.into(),
            latest_version: latest.into(),
            centrally_managed: false,
            severity: UpgradeSeverity::Minor,
            projects: projects.into_iter().map(reference).collect(),
        }
    }

    fn result(packages: Vec<ConsolidatedPackage>) -> UpgradeResult {
        let upgraded_projects = packages
            .iter()
            .flat_map(|p| p.projects.clone())
            .collect();
        UpgradeResult {
            success: true,
            upgraded_packages: packages,
            upgraded_projects,
        }
    }

    #[test]
    fn single_upgrade_names_branch_after_package() {
        let details = build(&result(vec![package(
            "TestPackage",
            "1.0.0",
            "1.0.1",
            vec!["TestProject"],
        )]));

        assert_eq!(details.branch_name, "neukeeper/upgrade_TestPackage_1.0.1");
        assert_eq!(details.title, "Upgrade TestPackage to 1.0.1");
        assert!(details.body_markdown.contains(
            "| TestProject | TestPackage | 1.0.0 | 1.0.1 |"
        ));
    }

    #[test]
    fn multiple_upgrades_use_count_and_hash() {
        let details = build(&result(vec![
            package("TestPackage1", "1.0.0", "1.0.1", vec!["TestProject1"]),
            package("TestPackage2", "2.0.0", "2.0.1", vec!["TestProject2"]),
        ]));

        assert!(details.branch_name.starts_with("neukeeper/2_upgrades_"));
        assert_eq!(details.title, "Upgrade 2 packages");
        assert!(details.body_markdown.contains(
            "| TestProject1 | TestPackage1 | 1.0.0 | 1.0.1 |"
        ));
        assert!(details.body_markdown.contains(
            "| TestProject2 | TestPackage2 | 2.0.0 | 2.0.1 |"
        ));
    }

    #[test]
    fn body_has_fixed_table_header() {
        let details = build(&result(vec![package(
            "Pkg",
            "1.0.0",
            "1.1.0",
            vec!["App"],
        )]));

        assert!(details.body_markdown.contains(
            "| Project | Package | Old Version | New Version |\n| - | - | - | - |\n"
        ));
    }

    #[test]
    fn build_is_deterministic() {
        let upgrade = result(vec![
            package("PkgA", "1.0.0", "1.1.0", vec!["App", "Lib"]),
            package("PkgB", "2.0.0", "2.1.0", vec!["App"]),
        ]);

        let first = build(&upgrade);
        let second = build(&upgrade);

        assert_eq!(first.branch_name, second.branch_name);
        assert_eq!(first.title, second.title);
        assert_eq!(first.body_markdown, second.body_markdown);
    }

    #[test]
    fn hash_is_order_invariant() {
        let forward = result(vec![
            package("PkgA", "1.0.0", "1.1.0", vec!["App"]),
            package("PkgB", "2.0.0", "2.1.0", vec!["Lib"]),
        ]);
        let reversed = result(vec![
            package("PkgB", "2.0.0", "2.1.0", vec!["Lib"]),
            package("PkgA", "1.0.0", "1.1.0", vec!["App"]),
        ]);

        assert_eq!(
            upgrade_set_hash(&forward),
            upgrade_set_hash(&reversed)
        );
    }

    #[test]
    fn hash_stays_in_modulus_range() {
        let upgrade = result(vec![
            package("Some.Very.Long.Package.Name", "1.0.0", "9.9.9", vec!["A"]),
            package("Another.Package", "0.1.0", "0.2.0", vec!["B", "C"]),
        ]);

        let hash = upgrade_set_hash(&upgrade);
        assert!((0..397).contains(&hash));
    }

    #[test]
    fn central_management_note_requires_every_package() {
        let mut all_central = result(vec![
            package("PkgA", "1.0.0", "1.1.0", vec!["App"]),
            package("PkgB", "2.0.0", "2.1.0", vec!["Lib"]),
        ]);
        for p in &mut all_central.upgraded_packages {
            p.centrally_managed = true;
        }

        let details = build(&all_central);
        assert!(details
            .body_markdown
            .contains("Central package management is used ✔️"));

        let mut mixed = all_central.clone();
        mixed.upgraded_packages[1].centrally_managed = false;

        let details = build(&mixed);
        assert!(!details
            .body_markdown
            .contains("Central package management is used"));
    }
}
