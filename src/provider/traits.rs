//! Trait implemented by every source-control backend.
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::{error::Result, upgrader::types::PrDetails};

/// Clone/publish protocol spoken by a source-control backend.
///
/// Both operations are invoked at most once per run, are non-reentrant, and
/// have no internal retry. A publish failure leaves any local commit intact
/// for manual recovery.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SourceControlProvider: Send + Sync {
    /// Clone the repository into a freshly allocated, run-exclusive
    /// temporary directory and return its path. Directories are never
    /// reused across runs.
    async fn clone_repo(&self, project_url: &str) -> Result<PathBuf>;

    /// Push the already-created local branch named in `pr_details` and open
    /// a pull request from it into `target_branch`. Returns the PR's
    /// canonical web URL.
    async fn create_pr(
        &self,
        project_url: &str,
        local_path: &Path,
        pr_details: &PrDetails,
        target_branch: &str,
    ) -> Result<String>;
}
