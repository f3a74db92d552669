//! The upgrade run: clone, analyze, select and apply, publish.
use std::sync::Arc;

use crate::{
    analyzer::{
        merge::{self, AnalysisFilter},
        traits::{DependencyAnalyzer, ProjectDiscovery},
    },
    cli::Args,
    clients::{
        console::{ConsolePrompt, ConsoleReporter},
        dotnet::DotnetCli,
    },
    command::{
        EXIT_SUCCESS, EXIT_UPDATES_FOUND, EXIT_UPGRADE_FAILED,
    },
    config::RunConfig,
    error::Result,
    provider::{factory, traits::SourceControlProvider},
    repo::{BranchWriteOutcome, Repository},
    upgrader::{
        consolidate::consolidate_packages,
        dedup::{ExistingBranch, filter_already_proposed},
        pr_details,
        selector::UpgradeSelector,
        traits::{ConfirmPrompt, PackageUpgrader, Reporter},
    },
};

/// Capability implementations the run is wired with. Production wiring uses
/// the dotnet/console clients; tests substitute mocks.
pub struct Capabilities {
    pub discovery: Box<dyn ProjectDiscovery>,
    pub analyzer: Arc<dyn DependencyAnalyzer>,
    pub upgrader: Box<dyn PackageUpgrader>,
    pub prompt: Box<dyn ConfirmPrompt>,
    pub reporter: Box<dyn Reporter>,
}

/// Resolve configuration, build the provider and default capabilities, and
/// execute the run.
pub async fn run(args: &Args) -> Result<u8> {
    let config = args.run_config()?;

    let provider = factory::create_provider(
        args.repo_type,
        &config.username,
        args.repo_token.as_deref(),
    )?;

    let capabilities = Capabilities {
        discovery: Box::new(DotnetCli::new(
            config.no_restore,
            config.transitive,
        )),
        analyzer: Arc::new(DotnetCli::new(
            config.no_restore,
            config.transitive,
        )),
        upgrader: Box::new(DotnetCli::new(
            config.no_restore,
            config.transitive,
        )),
        prompt: Box::new(ConsolePrompt),
        reporter: Box::new(ConsoleReporter),
    };

    execute(&config, provider.as_ref(), &capabilities).await
}

/// Execute one upgrade run against an already-built provider and
/// capability set. Returns the exit status for the process.
pub async fn execute(
    config: &RunConfig,
    provider: &dyn SourceControlProvider,
    capabilities: &Capabilities,
) -> Result<u8> {
    capabilities.reporter.note("checking out repository");
    let path = provider.clone_repo(&config.project_url).await?;

    capabilities.reporter.note("discovering projects");
    let discovered =
        capabilities.discovery.discover(&path, config.recursive)?;

    capabilities.reporter.note("analyzing dependencies");
    let filter = AnalysisFilter::from_config(config);
    let outdated = merge::analyze_projects(
        Arc::clone(&capabilities.analyzer),
        discovered,
        &filter,
    )
    .await?;

    if outdated.is_empty() {
        capabilities
            .reporter
            .note("No outdated dependencies were detected");
        return Ok(EXIT_SUCCESS);
    }

    capabilities.reporter.outdated_projects(&outdated);

    let repository = Repository::open(&path)?;
    let existing = ExistingBranch::from_branch_names(
        &repository.remote_branch_names()?,
    )?;

    let consolidated = consolidate_packages(&outdated);
    let candidates = filter_already_proposed(
        consolidated,
        &existing,
        capabilities.reporter.as_ref(),
    );

    let selector = UpgradeSelector::new(
        capabilities.upgrader.as_ref(),
        capabilities.prompt.as_ref(),
        capabilities.reporter.as_ref(),
    );
    let upgrade_result = selector.select_and_apply(
        candidates,
        config.max_package_updates,
        config.upgrade_mode,
    );

    if config.create_pr {
        if upgrade_result.upgraded_packages.is_empty() {
            capabilities
                .reporter
                .note("nothing was upgraded: skipping pull request");
        } else {
            // target branch is HEAD of the fresh clone, read before the
            // upgrade branch moves it
            let target_branch = repository.head_branch()?;
            let details = pr_details::build(&upgrade_result);

            match repository.write_upgrade_branch(
                &upgrade_result,
                &details,
                &config.identity,
            )? {
                BranchWriteOutcome::AlreadyExists => {
                    capabilities.reporter.note("branch already exists");
                    return Ok(EXIT_SUCCESS);
                }
                BranchWriteOutcome::Created { .. } => {}
            }

            let pr_url = provider
                .create_pr(&config.project_url, &path, &details, &target_branch)
                .await?;
            capabilities.reporter.note(&format!("Created PR: {pr_url}"));
        }
    }

    if config.fail_on_updates {
        return Ok(EXIT_UPDATES_FOUND);
    }

    if !upgrade_result.success {
        return Ok(EXIT_UPGRADE_FAILED);
    }

    Ok(EXIT_SUCCESS)
}
