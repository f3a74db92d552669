//! Capability implementations backed by the `dotnet` CLI.
//!
//! `dotnet list package --outdated` performs the registry resolution and
//! `dotnet add package` performs the manifest edit, so the core never
//! parses or rewrites project files itself.
use async_trait::async_trait;
use color_eyre::eyre::eyre;
use log::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::{
    analyzer::{
        traits::{DependencyAnalyzer, ProjectDiscovery},
        types::{
            AnalyzedDependency, AnalyzedTargetFramework, DiscoveredProject,
        },
    },
    error::Result,
    upgrader::traits::PackageUpgrader,
};

const PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj"];
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git"];
const CENTRAL_PACKAGES_FILE: &str = "Directory.Packages.props";

/// All dotnet-backed capabilities in one client.
pub struct DotnetCli {
    no_restore: bool,
    transitive: bool,
}

impl DotnetCli {
    pub fn new(no_restore: bool, transitive: bool) -> Self {
        Self {
            no_restore,
            transitive,
        }
    }
}

// `dotnet list package --format json` report shape.

#[derive(Debug, Deserialize)]
struct OutdatedReport {
    #[serde(default)]
    projects: Vec<ReportProject>,
}

#[derive(Debug, Deserialize)]
struct ReportProject {
    #[serde(default)]
    frameworks: Vec<ReportFramework>,
}

#[derive(Debug, Deserialize)]
struct ReportFramework {
    framework: String,
    #[serde(default, rename = "topLevelPackages")]
    top_level_packages: Vec<ReportPackage>,
    #[serde(default, rename = "transitivePackages")]
    transitive_packages: Vec<ReportPackage>,
}

#[derive(Debug, Deserialize)]
struct ReportPackage {
    id: String,
    #[serde(rename = "resolvedVersion")]
    resolved_version: String,
    #[serde(rename = "latestVersion")]
    latest_version: String,
    #[serde(default, rename = "autoReferenced")]
    auto_referenced: bool,
}

fn collect_projects(
    dir: &Path,
    recursive: bool,
    found: &mut Vec<DiscoveredProject>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            let skip = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if recursive && !skip {
                collect_projects(&path, recursive, found)?;
            }
            continue;
        }

        let is_project = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PROJECT_EXTENSIONS.contains(&ext));

        if is_project {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string();
            found.push(DiscoveredProject {
                name,
                file_path: path,
            });
        }
    }

    Ok(())
}

impl ProjectDiscovery for DotnetCli {
    fn discover(
        &self,
        root: &Path,
        recursive: bool,
    ) -> Result<Vec<DiscoveredProject>> {
        let mut found = vec![];
        collect_projects(root, recursive, &mut found)?;
        found.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        debug!("discovered {} project(s)", found.len());
        Ok(found)
    }
}

#[async_trait]
impl DependencyAnalyzer for DotnetCli {
    async fn outdated_frameworks(
        &self,
        project: &DiscoveredProject,
    ) -> Result<Vec<AnalyzedTargetFramework>> {
        let mut args = vec![
            "list".to_string(),
            project.file_path.display().to_string(),
            "package".to_string(),
            "--outdated".to_string(),
            "--format".to_string(),
            "json".to_string(),
        ];
        if self.transitive {
            args.push("--include-transitive".to_string());
        }

        let output = tokio::process::Command::new("dotnet")
            .args(&args)
            .output()
            .await?;

        if !output.status.success() {
            return Err(eyre!(
                "dotnet list failed for {}: {}",
                project.name,
                String::from_utf8_lossy(&output.stderr)
            )
            .into());
        }

        let report: OutdatedReport = serde_json::from_slice(&output.stdout)?;

        let mut frameworks = vec![];
        for report_project in report.projects {
            for framework in report_project.frameworks {
                let mut dependencies = vec![];

                for package in &framework.top_level_packages {
                    dependencies.push(to_dependency(package, false));
                }
                for package in &framework.transitive_packages {
                    dependencies.push(to_dependency(package, true));
                }

                if !dependencies.is_empty() {
                    frameworks.push(AnalyzedTargetFramework {
                        name: framework.framework,
                        dependencies,
                    });
                }
            }
        }

        Ok(frameworks)
    }

    fn centrally_managed(&self, project: &DiscoveredProject) -> bool {
        let mut dir: Option<&Path> = project.file_path.parent();
        while let Some(current) = dir {
            if current.join(CENTRAL_PACKAGES_FILE).is_file() {
                return true;
            }
            dir = current.parent();
        }
        false
    }
}

fn to_dependency(
    package: &ReportPackage,
    transitive: bool,
) -> AnalyzedDependency {
    let mut dependency = AnalyzedDependency::new(
        package.id.clone(),
        package.resolved_version.clone(),
        package.latest_version.clone(),
    );
    dependency.transitive = transitive;
    dependency.auto_reference = package.auto_referenced;
    dependency
}

impl PackageUpgrader for DotnetCli {
    // With central package management the SDK rewrites
    // Directory.Packages.props instead of the project file; the invocation
    // is the same either way.
    fn apply_upgrade(
        &self,
        manifest_path: &Path,
        package: &str,
        version: &str,
        _centrally_managed: bool,
    ) -> Result<()> {
        let mut command = std::process::Command::new("dotnet");
        command
            .arg("add")
            .arg(manifest_path)
            .arg("package")
            .arg(package)
            .arg("--version")
            .arg(version);

        if self.no_restore {
            command.arg("--no-restore");
        }

        let output = command.output()?;

        if !output.status.success() {
            return Err(eyre!(
                "dotnet add package failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )
            .into());
        }

        Ok(())
    }
}
