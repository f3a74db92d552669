//! Consolidates per-project outdated findings into one upgrade candidate
//! per distinct package.

use std::collections::HashMap;

use crate::{
    analyzer::types::AnalyzedProject,
    upgrader::types::{ConsolidatedPackage, PackageProjectReference},
};

/// Group every (project, framework, dependency) triple under one
/// [`ConsolidatedPackage`] per package name, creating candidates in
/// first-encountered traversal order. The first-seen resolved/latest
/// version pair wins for the whole candidate.
pub fn consolidate_packages(
    projects: &[AnalyzedProject],
) -> Vec<ConsolidatedPackage> {
    let mut packages: Vec<ConsolidatedPackage> = vec![];
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for project in projects {
        for framework in &project.target_frameworks {
            for dependency in &framework.dependencies {
                let index = *index_by_name
                    .entry(dependency.name.clone())
                    .or_insert_with(|| {
                        packages.push(ConsolidatedPackage {
                            name: dependency.name.clone(),
                            resolved_version: dependency
                                .resolved_version
                                .clone(),
                            latest_version: dependency.latest_version.clone(),
                            centrally_managed: project.centrally_managed,
                            severity: dependency.severity,
                            projects: vec![],
                        });
                        packages.len() - 1
                    });

                packages[index].projects.push(PackageProjectReference {
                    project: project.name.clone(),
                    manifest_path: project.file_path.clone(),
                    framework: framework.name.clone(),
                });
            }
        }
    }

    packages
}
