//! Resolved run configuration.
//!
//! CLI flags are resolved into this structure exactly once at startup and
//! passed down by construction. Nothing below the CLI layer reads arguments
//! or environment variables ad hoc (provider tokens are resolved once in the
//! provider registry).

use clap::ValueEnum;

/// How confirmed a candidate must be before its upgrade is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpgradeMode {
    /// Apply every selected candidate without asking.
    Auto,
    /// Ask for confirmation before each candidate; "no" skips it entirely.
    Prompt,
}

/// Author identity used for the upgrade commit.
#[derive(Debug, Clone)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Everything a single run needs, resolved from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Repository browse/clone URL as given on the command line.
    pub project_url: String,
    /// Username for provider authentication and the commit author.
    pub username: String,
    /// Author identity for the upgrade commit.
    pub identity: CommitIdentity,
    /// Auto or Prompt selection of candidates.
    pub upgrade_mode: UpgradeMode,
    /// Upper bound on candidates attempted in one run. None means unbounded.
    pub max_package_updates: Option<usize>,
    /// Whether to publish a branch and pull request after upgrading.
    pub create_pr: bool,
    /// Exit with status 2 when outdated dependencies were found.
    pub fail_on_updates: bool,
    /// Recursively search the clone for project files.
    pub recursive: bool,
    /// Include auto-referenced packages in the analysis.
    pub include_auto_references: bool,
    /// Also analyze transitive dependencies.
    pub transitive: bool,
    /// Only packages whose name contains one of these strings (case
    /// insensitive). Empty means no include filtering.
    pub filter_include: Vec<String>,
    /// Exclude packages whose name contains one of these strings.
    pub filter_exclude: Vec<String>,
    /// Skip restore/compatibility checks when applying upgrades.
    pub no_restore: bool,
}
