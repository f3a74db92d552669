//! Concurrent analysis fan-out and its unordered merge point.
//!
//! Each project is analyzed in its own task with no ordering guarantee
//! among them; results are merged in completion order. Everything
//! downstream of this stage must tolerate any arrival order, which is an
//! explicit contract and is exercised by the consolidation tests.
use color_eyre::eyre::eyre;
use log::*;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::{
    analyzer::{
        traits::DependencyAnalyzer,
        types::{
            AnalyzedDependency, AnalyzedProject, AnalyzedTargetFramework,
            DiscoveredProject,
        },
    },
    config::RunConfig,
    error::{NeukeeperError, Result},
};

/// Name-based dependency filtering applied before consolidation.
#[derive(Debug, Clone, Default)]
pub struct AnalysisFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    include_auto_references: bool,
}

impl AnalysisFilter {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            include: config.filter_include.clone(),
            exclude: config.filter_exclude.clone(),
            include_auto_references: config.include_auto_references,
        }
    }

    fn allows(&self, dependency: &AnalyzedDependency) -> bool {
        if dependency.auto_reference && !self.include_auto_references {
            return false;
        }

        let name = dependency.name.to_lowercase();

        if !self.include.is_empty()
            && !self
                .include
                .iter()
                .any(|part| name.contains(&part.to_lowercase()))
        {
            return false;
        }

        !self
            .exclude
            .iter()
            .any(|part| name.contains(&part.to_lowercase()))
    }
}

/// Analyze every discovered project concurrently and merge the outdated
/// findings. Projects with nothing outdated after filtering are dropped.
pub async fn analyze_projects(
    analyzer: Arc<dyn DependencyAnalyzer>,
    projects: Vec<DiscoveredProject>,
    filter: &AnalysisFilter,
) -> Result<Vec<AnalyzedProject>> {
    let mut tasks = JoinSet::new();

    for project in projects {
        let analyzer = Arc::clone(&analyzer);
        tasks.spawn(async move {
            let frameworks = analyzer.outdated_frameworks(&project).await?;
            let centrally_managed = analyzer.centrally_managed(&project);
            Ok::<_, NeukeeperError>((project, centrally_managed, frameworks))
        });
    }

    let mut results = vec![];

    while let Some(joined) = tasks.join_next().await {
        let (project, centrally_managed, frameworks) = joined
            .map_err(|err| eyre!("analysis task failed: {err}"))??;
        results.push((project, centrally_managed, frameworks));
    }

    Ok(merge_findings(results, filter))
}

/// Pure merge of per-project analysis results. Accepts results in any order
/// and makes no assumptions about stable indices.
pub fn merge_findings(
    results: Vec<(DiscoveredProject, bool, Vec<AnalyzedTargetFramework>)>,
    filter: &AnalysisFilter,
) -> Vec<AnalyzedProject> {
    let mut outdated = vec![];

    for (project, centrally_managed, frameworks) in results {
        let frameworks: Vec<AnalyzedTargetFramework> = frameworks
            .into_iter()
            .map(|framework| AnalyzedTargetFramework {
                name: framework.name,
                dependencies: framework
                    .dependencies
                    .into_iter()
                    .filter(|dep| filter.allows(dep))
                    .collect(),
            })
            .filter(|framework| !framework.dependencies.is_empty())
            .collect();

        if frameworks.is_empty() {
            debug!("project {} is up to date", project.name);
            continue;
        }

        outdated.push(AnalyzedProject {
            name: project.name,
            file_path: project.file_path,
            centrally_managed,
            target_frameworks: frameworks,
        });
    }

    outdated
}
