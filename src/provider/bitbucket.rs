//! Bitbucket Server provider implementation.
//!
//! Speaks the Bitbucket Server (Stash) REST protocol: repository lookup for
//! the http clone link, pull-request creation, and the default-reviewers
//! endpoint. Git operations authenticate with a bearer Authorization
//! header.
use async_trait::async_trait;
use regex::Regex;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};

use crate::{
    error::{NeukeeperError, Result},
    provider::{
        bitbucket::types::{
            BitbucketRepo, CreatePullRequest, ProjectKey, PullRequestRef,
            PullRequestResponse, RefRepository, Reviewer, ReviewerUser,
            UserName,
        },
        config::ProviderConfig,
        traits::SourceControlProvider,
    },
    repo::{self, GitCredentials, Repository},
    upgrader::types::PrDetails,
};

mod types;

/// Location of a repository parsed from a Bitbucket Server browse URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitbucketRepoDetails {
    /// Scheme and host part, e.g. `https://bitbucket.example.com`.
    pub base_path: String,
    /// Project key or user name the repository lives under.
    pub project: String,
    /// Repository slug.
    pub repo_slug: String,
}

impl BitbucketRepoDetails {
    /// Parse a browse URL of the form
    /// `https://host/projects/<project>/repos/<repo>/browse`. Fails fast
    /// before any network call when the URL does not match.
    pub fn from_url(project_url: &str) -> Result<Self> {
        let regex = Regex::new(
            r"(?<base_path>https?://.*)/(projects|users)/(?<project>[^/]*)/repos/(?<repo>[^/]*)/browse",
        )?;

        let captures = regex.captures(project_url).ok_or_else(|| {
            NeukeeperError::parse(format!("couldn't parse url {project_url}"))
        })?;

        Ok(Self {
            base_path: captures["base_path"].to_string(),
            project: captures["project"].to_string(),
            repo_slug: captures["repo"].to_string(),
        })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/rest/api/1.0/projects/{}/repos/{}",
            self.base_path, self.project, self.repo_slug
        )
    }

    fn reviewers_url(&self) -> String {
        format!(
            "{}/rest/default-reviewers/1.0/projects/{}/repos/{}/reviewers",
            self.base_path, self.project, self.repo_slug
        )
    }
}

/// Bitbucket Server backend.
pub struct BitbucketServer {
    config: ProviderConfig,
}

impl BitbucketServer {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn client(&self) -> Result<Client> {
        let token = self.config.token.expose_secret();

        let mut headers = HeaderMap::new();
        let token_value =
            HeaderValue::from_str(format!("Bearer {token}").as_str())?;
        headers.append("Authorization", token_value);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(client)
    }

    async fn get_repo(
        &self,
        client: &Client,
        details: &BitbucketRepoDetails,
    ) -> Result<BitbucketRepo> {
        let response = client.get(details.api_url()).send().await?;
        let result = response.error_for_status()?;
        let repo: BitbucketRepo = result.json().await?;
        Ok(repo)
    }

    /// Query the default reviewers for a PR from `source_branch` into
    /// `target_branch` and keep every active one.
    async fn default_reviewers(
        &self,
        client: &Client,
        details: &BitbucketRepoDetails,
        repo_id: u64,
        source_branch: &str,
        target_branch: &str,
    ) -> Result<Vec<Reviewer>> {
        let response = client
            .get(details.reviewers_url())
            .query(&[
                ("sourceRepoId", repo_id.to_string()),
                ("targetRepoId", repo_id.to_string()),
                (
                    "sourceRefId",
                    format!("refs/heads/{source_branch}"),
                ),
                (
                    "targetRefId",
                    format!("refs/heads/{target_branch}"),
                ),
            ])
            .send()
            .await?;
        let result = response.error_for_status()?;
        let users: Vec<ReviewerUser> = result.json().await?;

        Ok(users
            .into_iter()
            .filter(|user| user.active)
            .map(|user| Reviewer {
                user: UserName { name: user.name },
            })
            .collect())
    }
}

#[async_trait]
impl SourceControlProvider for BitbucketServer {
    async fn clone_repo(&self, project_url: &str) -> Result<PathBuf> {
        let details = BitbucketRepoDetails::from_url(project_url)?;
        let client = self.client()?;
        let repo = self.get_repo(&client, &details).await?;

        let clone_url = repo
            .links
            .clone
            .iter()
            .find(|link| link.name.as_deref() == Some("http"))
            .map(|link| link.href.clone())
            .ok_or_else(|| {
                NeukeeperError::network(format!(
                    "no http clone link for {}",
                    details.repo_slug
                ))
            })?;

        let directory = tempfile::Builder::new()
            .prefix("neukeeper-")
            .tempdir()?
            .keep();

        let token = self.config.token.expose_secret().to_string();
        repo::clone_repo(
            &clone_url,
            &directory,
            &GitCredentials::BearerHeader { token: &token },
        )?;

        Ok(directory)
    }

    async fn create_pr(
        &self,
        project_url: &str,
        local_path: &Path,
        pr_details: &PrDetails,
        target_branch: &str,
    ) -> Result<String> {
        let details = BitbucketRepoDetails::from_url(project_url)?;
        let client = self.client()?;
        let repo = self.get_repo(&client, &details).await?;

        let token = self.config.token.expose_secret().to_string();
        let repository = Repository::open(local_path)?;
        repository.push_branch(
            &pr_details.branch_name,
            &GitCredentials::BearerHeader { token: &token },
        )?;

        let reviewers = self
            .default_reviewers(
                &client,
                &details,
                repo.id,
                &pr_details.branch_name,
                target_branch,
            )
            .await?;

        let payload = CreatePullRequest {
            title: pr_details.title.clone(),
            description: pr_details.body_markdown.clone(),
            state: "OPEN".to_string(),
            from_ref: PullRequestRef {
                id: format!("refs/heads/{}", pr_details.branch_name),
                repository: RefRepository {
                    slug: repo.slug.clone(),
                    project: ProjectKey {
                        key: repo.project.key.clone(),
                    },
                },
            },
            to_ref: PullRequestRef {
                id: format!("refs/heads/{target_branch}"),
                repository: RefRepository {
                    slug: repo.slug.clone(),
                    project: ProjectKey {
                        key: repo.project.key.clone(),
                    },
                },
            },
            reviewers,
        };

        let endpoint = format!("{}/pull-requests", details.api_url());
        let response = client.post(endpoint).json(&payload).send().await?;
        let result = response.error_for_status()?;
        let pr: PullRequestResponse = result.json().await?;

        pr.links
            .self_links
            .first()
            .map(|link| link.href.clone())
            .ok_or_else(|| {
                NeukeeperError::network(
                    "pull request response carried no self link",
                )
            })
    }
}
