//! CLI argument parsing and run configuration resolution.
use clap::Parser;

use crate::{
    config::{CommitIdentity, RunConfig, UpgradeMode},
    error::{NeukeeperError, Result},
    provider::config::RepoKind,
};

const DEFAULT_MAX_PACKAGE_UPDATES: usize = 1;

/// CLI arguments for a single upgrade run.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Repository URL to check out and open upgrade PRs against.
    pub project_url: String,

    #[arg(long, value_enum)]
    /// Type of source control system hosting the repository.
    pub repo_type: RepoKind,

    #[arg(long)]
    /// Username used for authentication and the commit author.
    pub username: String,

    #[arg(long, default_value = "neukeeper@users.noreply.github.com")]
    /// Email used in the commit author identity.
    pub commit_email: String,

    #[arg(long)]
    /// Access token for the provider. Falls back to the provider-specific
    /// environment variable (GITHUB_TOKEN or BITBUCKET_TOKEN).
    pub repo_token: Option<String>,

    #[arg(long, short = 'u', value_enum, default_value_t = UpgradeMode::Auto)]
    /// Whether to apply upgrades automatically or prompt per package.
    pub upgrade: UpgradeMode,

    #[arg(long, default_value_t = DEFAULT_MAX_PACKAGE_UPDATES)]
    /// Max package updates to apply in one run. Use 0 for no limit.
    pub max_package_updates: usize,

    #[arg(long, default_value_t = false)]
    /// Create a branch and pull request for the applied upgrades.
    pub create_pr: bool,

    #[arg(long, short = 'f', default_value_t = false)]
    /// Return a non-zero exit code when updates are found.
    pub fail_on_updates: bool,

    #[arg(long, short = 'r', default_value_t = false)]
    /// Recursively search for all projects within the repository.
    pub recursive: bool,

    #[arg(long, default_value_t = false)]
    /// Include auto-referenced packages.
    pub include_auto_references: bool,

    #[arg(long, short = 't', default_value_t = false)]
    /// Also detect outdated transitive dependencies.
    pub transitive: bool,

    #[arg(long = "include", short = 'i')]
    /// Only look at packages whose name contains the provided string.
    /// May be given multiple times; a single match includes the package.
    pub filter_include: Vec<String>,

    #[arg(long = "exclude", short = 'e')]
    /// Skip packages whose name contains the provided string.
    /// May be given multiple times; a single match excludes the package.
    pub filter_exclude: Vec<String>,

    #[arg(long, default_value_t = false)]
    /// Apply upgrades without performing a restore preview.
    pub no_restore: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Resolve the run configuration from arguments, validating required
    /// identity fields. Token resolution happens in the provider registry.
    pub fn run_config(&self) -> Result<RunConfig> {
        if self.username.trim().is_empty() {
            return Err(NeukeeperError::invalid_config(
                "username must be provided",
            ));
        }

        if self.project_url.trim().is_empty() {
            return Err(NeukeeperError::invalid_config(
                "project URL must be provided",
            ));
        }

        let max_package_updates = if self.max_package_updates == 0 {
            None
        } else {
            Some(self.max_package_updates)
        };

        Ok(RunConfig {
            project_url: self.project_url.clone(),
            username: self.username.clone(),
            identity: CommitIdentity {
                name: self.username.clone(),
                email: self.commit_email.clone(),
            },
            upgrade_mode: self.upgrade,
            max_package_updates,
            create_pr: self.create_pr,
            fail_on_updates: self.fail_on_updates,
            recursive: self.recursive,
            include_auto_references: self.include_auto_references,
            transitive: self.transitive,
            filter_include: self.filter_include.clone(),
            filter_exclude: self.filter_exclude.clone(),
            no_restore: self.no_restore,
        })
    }
}
