//! Git repository operations for upgrade runs.
//!
//! Wraps `git2` with the operations the run needs: cloning into the
//! run-exclusive directory, listing remote branches for dedup, writing the
//! upgrade branch (exactly one commit per run), and pushing with the
//! provider's credentials.
use color_eyre::eyre::eyre;
use git2::{BranchType, RemoteCallbacks};
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    config::CommitIdentity,
    error::{NeukeeperError, Result},
    upgrader::types::{PrDetails, UpgradeResult},
};

/// Remote name used by a fresh clone.
const DEFAULT_REMOTE: &str = "origin";

/// How git network operations authenticate. GitHub takes username/token
/// credentials; Bitbucket Server expects a bearer Authorization header.
pub enum GitCredentials<'a> {
    UserPass { username: &'a str, token: &'a str },
    BearerHeader { token: &'a str },
}

/// Result of attempting to write the upgrade branch.
#[derive(Debug, PartialEq, Eq)]
pub enum BranchWriteOutcome {
    /// Branch was created with a single commit; holds the canonical ref.
    Created { ref_name: String },
    /// A branch with this name already exists locally. Not an error: the
    /// same proposal was already written in this window.
    AlreadyExists,
}

/// Create git authentication callbacks for username/token authentication.
fn userpass_callbacks<'r>(user: String, token: String) -> RemoteCallbacks<'r> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username, _allowed| {
        git2::Cred::userpass_plaintext(&user, &token)
    });
    callbacks
}

fn apply_fetch_credentials(
    fetch_options: &mut git2::FetchOptions,
    credentials: &GitCredentials,
) {
    match credentials {
        GitCredentials::UserPass { username, token } => {
            fetch_options.remote_callbacks(userpass_callbacks(
                (*username).to_string(),
                (*token).to_string(),
            ));
        }
        GitCredentials::BearerHeader { token } => {
            let header = format!("Authorization: Bearer {token}");
            fetch_options.custom_headers(&[header.as_str()]);
        }
    }
}

/// Clone `url` into `into`, authenticating with the given credentials.
pub fn clone_repo(
    url: &str,
    into: &Path,
    credentials: &GitCredentials,
) -> Result<Repository> {
    info!("cloning {url} into {}", into.display());

    let mut fetch_options = git2::FetchOptions::new();
    apply_fetch_credentials(&mut fetch_options, credentials);

    let mut builder = git2::build::RepoBuilder::new();
    let repo = builder
        .fetch_options(fetch_options)
        .clone(url, into)
        .map_err(|err| {
            NeukeeperError::network(format!("failed to clone {url}: {err}"))
        })?;

    Ok(Repository { repo })
}

/// A checked-out working copy owned by the current run.
pub struct Repository {
    repo: git2::Repository,
}

impl Repository {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::open(path)?;
        Ok(Self { repo })
    }

    /// Branch name HEAD points at, used as the PR target branch.
    pub fn head_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(String::from)
            .ok_or_else(|| eyre!("HEAD is not a named branch").into())
    }

    /// Names of every remote-tracking branch, e.g.
    /// `origin/neukeeper/upgrade_Pkg_1.1.0`.
    pub fn remote_branch_names(&self) -> Result<Vec<String>> {
        let mut names = vec![];
        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| eyre!("repository has no working directory").into())
    }

    fn detected_remote(&self) -> Result<String> {
        if self.repo.find_remote(DEFAULT_REMOTE).is_ok() {
            return Ok(DEFAULT_REMOTE.to_string());
        }

        let remotes = self.repo.remotes()?;
        remotes
            .get(0)
            .map(String::from)
            .ok_or_else(|| eyre!("repository has no remotes").into())
    }

    /// Write the upgrade branch: create it from HEAD, stage exactly the
    /// distinct manifest paths the run touched, commit once with the run's
    /// author identity and the PR title as message, and point the branch's
    /// upstream at the detected remote.
    pub fn write_upgrade_branch(
        &self,
        upgrade_result: &UpgradeResult,
        pr_details: &PrDetails,
        identity: &CommitIdentity,
    ) -> Result<BranchWriteOutcome> {
        let branch_name = &pr_details.branch_name;

        if self
            .repo
            .find_branch(branch_name, BranchType::Local)
            .is_ok()
        {
            return Ok(BranchWriteOutcome::AlreadyExists);
        }

        info!("creating branch: {branch_name}");
        let head_commit = self.repo.head()?.peel_to_commit()?;
        let branch = self.repo.branch(branch_name, &head_commit, false)?;

        let ref_name = format!("refs/heads/{branch_name}");
        let target = self.repo.revparse_single(&ref_name)?;
        self.repo.checkout_tree(&target, None)?;
        self.repo.set_head(&ref_name)?;

        let workdir = self.workdir()?.to_path_buf();
        let mut index = self.repo.index()?;
        let mut staged: Vec<PathBuf> = vec![];

        for reference in &upgrade_result.upgraded_projects {
            let relative = reference
                .manifest_path
                .strip_prefix(&workdir)
                .unwrap_or(&reference.manifest_path)
                .to_path_buf();

            if staged.contains(&relative) {
                continue;
            }

            index.add_path(&relative)?;
            info!("staged {}", relative.display());
            staged.push(relative);
        }

        index.write()?;

        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;
        let author =
            git2::Signature::now(&identity.name, &identity.email)?;
        self.repo.commit(
            Some("HEAD"),
            &author,
            &author,
            &pr_details.title,
            &tree,
            &[&head_commit],
        )?;

        let remote = self.detected_remote()?;
        let mut config = self.repo.config()?;
        config.set_str(&format!("branch.{branch_name}.remote"), &remote)?;
        config.set_str(&format!("branch.{branch_name}.merge"), &ref_name)?;

        let canonical = branch
            .get()
            .name()
            .map(String::from)
            .unwrap_or(ref_name);

        Ok(BranchWriteOutcome::Created {
            ref_name: canonical,
        })
    }

    /// Push a local branch to the detected remote.
    pub fn push_branch(
        &self,
        branch: &str,
        credentials: &GitCredentials,
    ) -> Result<()> {
        info!("pushing branch {branch}");

        let mut push_opts = git2::PushOptions::new();
        match credentials {
            GitCredentials::UserPass { username, token } => {
                push_opts.remote_callbacks(userpass_callbacks(
                    (*username).to_string(),
                    (*token).to_string(),
                ));
            }
            GitCredentials::BearerHeader { token } => {
                let header = format!("Authorization: Bearer {token}");
                push_opts.custom_headers(&[header.as_str()]);
            }
        }

        let remote_name = self.detected_remote()?;
        let mut remote = self.repo.find_remote(&remote_name)?;

        let ref_spec = format!("refs/heads/{branch}");
        remote
            .push(&[ref_spec], Some(&mut push_opts))
            .map_err(|err| {
                NeukeeperError::network(format!(
                    "failed to push branch {branch}: {err}"
                ))
            })?;

        Ok(())
    }
}
