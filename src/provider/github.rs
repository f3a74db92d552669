//! GitHub provider implementation.
use async_trait::async_trait;
use git_url_parse::GitUrl;
use octocrab::Octocrab;
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};

use crate::{
    error::{NeukeeperError, Result},
    provider::{config::ProviderConfig, traits::SourceControlProvider},
    repo::{self, GitCredentials, Repository},
    upgrader::types::PrDetails,
};

/// GitHub backend: git operations authenticate with username/token
/// credentials, the pull request is opened through Octocrab.
pub struct Github {
    config: ProviderConfig,
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: git_url_parse::Scheme) -> Result<()> {
    match scheme {
        git_url_parse::Scheme::Http | git_url_parse::Scheme::Https => Ok(()),
        _ => Err(NeukeeperError::parse(
            "only http and https schemes are supported for repo urls",
        )),
    }
}

impl Github {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn credentials<'a>(&'a self, token: &'a str) -> GitCredentials<'a> {
        GitCredentials::UserPass {
            username: &self.config.username,
            token,
        }
    }
}

#[async_trait]
impl SourceControlProvider for Github {
    async fn clone_repo(&self, project_url: &str) -> Result<PathBuf> {
        let parsed = GitUrl::parse(project_url)?;
        validate_scheme(parsed.scheme)?;

        let directory = tempfile::Builder::new()
            .prefix("neukeeper-")
            .tempdir()?
            .keep();

        let token = self.config.token.expose_secret().to_string();
        repo::clone_repo(project_url, &directory, &self.credentials(&token))?;

        Ok(directory)
    }

    async fn create_pr(
        &self,
        project_url: &str,
        local_path: &Path,
        pr_details: &PrDetails,
        target_branch: &str,
    ) -> Result<String> {
        let parsed = GitUrl::parse(project_url)?;
        validate_scheme(parsed.scheme)?;

        let host = parsed.host.ok_or_else(|| {
            NeukeeperError::parse(format!(
                "unable to parse host from {project_url}"
            ))
        })?;
        let owner = parsed.owner.ok_or_else(|| {
            NeukeeperError::parse(format!(
                "unable to parse owner from {project_url}"
            ))
        })?;

        let token = self.config.token.expose_secret().to_string();
        let repository = Repository::open(local_path)?;
        repository
            .push_branch(&pr_details.branch_name, &self.credentials(&token))?;

        let base_uri = format!("{}://api.{}", parsed.scheme, host);
        let instance = Octocrab::builder()
            .personal_token(self.config.token.clone())
            .base_uri(base_uri)?
            .build()?;

        let pr = instance
            .pulls(&owner, &parsed.name)
            .create(
                &pr_details.title,
                &pr_details.branch_name,
                target_branch,
            )
            .body(&pr_details.body_markdown)
            .send()
            .await?;

        pr.html_url
            .map(|url| url.to_string())
            .ok_or_else(|| {
                NeukeeperError::network(
                    "pull request response carried no html url",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn github() -> Github {
        Github::new(ProviderConfig {
            username: "keeper".into(),
            token: SecretString::from("token".to_string()),
        })
    }

    #[tokio::test]
    async fn rejects_ssh_urls_before_any_network_call() {
        let provider = github();
        let result = provider
            .clone_repo("git@github.com:owner/repo.git")
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn only_supports_http_and_https_schemes() {
        let parsed = GitUrl::parse("ssh://git@github.com/owner/repo").unwrap();
        assert!(validate_scheme(parsed.scheme).is_err());

        let parsed = GitUrl::parse("https://github.com/owner/repo").unwrap();
        assert!(validate_scheme(parsed.scheme).is_ok());
    }
}
