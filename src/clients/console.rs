//! Console-backed prompt and reporter.
use colored::{ColoredString, Colorize};
use log::*;
use std::io::{self, BufRead, Write};

use crate::{
    analyzer::types::{AnalyzedProject, UpgradeSeverity},
    upgrader::{
        traits::{ConfirmPrompt, Reporter},
        types::ConsolidatedPackage,
    },
};

fn severity_colored(version: &str, severity: UpgradeSeverity) -> ColoredString {
    match severity {
        UpgradeSeverity::Major => version.red(),
        UpgradeSeverity::Minor => version.yellow(),
        UpgradeSeverity::Patch => version.green(),
        UpgradeSeverity::Unknown => version.normal(),
    }
}

/// Interactive yes/no confirmation on stdin. Defaults to yes.
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn read_answer(&self) -> io::Result<String> {
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_lowercase())
    }
}

impl ConfirmPrompt for ConsolePrompt {
    fn confirm(&self, package: &ConsolidatedPackage) -> bool {
        println!(
            "The package {} can be upgraded from {} to {}. The following project(s) will be affected:",
            package.name.cyan(),
            package.resolved_version,
            severity_colored(&package.latest_version, package.severity),
        );
        for reference in &package.projects {
            println!("  » {}", reference.project);
        }
        print!("Do you wish to upgrade this package? [Y/n] ");
        let _ = io::stdout().flush();

        match self.read_answer() {
            Ok(answer) => answer.is_empty() || answer == "y" || answer == "yes",
            Err(_) => false,
        }
    }
}

/// Log-backed reporter with colorized outdated listing.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn note(&self, message: &str) {
        info!("{message}");
    }

    fn outdated_projects(&self, projects: &[AnalyzedProject]) {
        for project in projects {
            println!("» {}", project.name.magenta());

            for framework in &project.target_frameworks {
                println!("  [{}]", framework.name.cyan());

                for dependency in &framework.dependencies {
                    println!(
                        "  {} {} -> {}",
                        dependency.name,
                        dependency.resolved_version,
                        severity_colored(
                            &dependency.latest_version,
                            dependency.severity
                        ),
                    );
                }
            }

            println!();
        }
    }

    fn existing_branch_skip(&self, package: &str, version: &str) {
        info!("there is already a branch for {package}@{version}");
    }

    fn upgrade_applied(&self, package: &str, project: &str) {
        info!(
            "{}",
            format!("project {project} upgraded to latest {package}").green()
        );
    }

    fn upgrade_failed(&self, package: &str, project: &str, detail: &str) {
        error!(
            "{}",
            format!(
                "an error occurred while upgrading {package} in {project}: {detail}"
            )
            .red()
        );
    }
}
