//! Capability traits for project discovery and dependency analysis.
//!
//! Both concerns are external collaborators: the core only depends on these
//! seams. Default implementations backed by the dotnet CLI live in
//! `crate::clients`.
use async_trait::async_trait;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::{
    analyzer::types::{AnalyzedTargetFramework, DiscoveredProject},
    error::Result,
};

/// Finds project manifests in a checked-out working copy.
#[cfg_attr(test, automock)]
pub trait ProjectDiscovery: Send + Sync {
    fn discover(
        &self,
        root: &Path,
        recursive: bool,
    ) -> Result<Vec<DiscoveredProject>>;
}

/// Resolves the outdated dependencies of a single project against its
/// package sources. Implementations are free to be slow; callers fan out
/// one task per project.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DependencyAnalyzer: Send + Sync {
    async fn outdated_frameworks(
        &self,
        project: &DiscoveredProject,
    ) -> Result<Vec<AnalyzedTargetFramework>>;

    /// Whether the project's package versions are centrally managed.
    fn centrally_managed(&self, project: &DiscoveredProject) -> bool;
}
