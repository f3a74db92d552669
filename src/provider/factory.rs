//! Registry mapping a repo-type tag to its provider constructor.
//!
//! Adding a backend means adding one [`ProviderRegistration`] entry; no
//! conditional chain to edit. Each registration carries the provider's
//! credential-resolution rule: an explicit token flag wins, then the
//! provider-specific environment variable, then configuration failure.
use secrecy::SecretString;
use std::env;

use crate::{
    error::{NeukeeperError, Result},
    provider::{
        bitbucket::BitbucketServer,
        config::{ProviderConfig, RepoKind},
        github::Github,
        traits::SourceControlProvider,
    },
};

struct ProviderRegistration {
    kind: RepoKind,
    token_env_var: &'static str,
    build: fn(ProviderConfig) -> Box<dyn SourceControlProvider>,
}

const REGISTRY: &[ProviderRegistration] = &[
    ProviderRegistration {
        kind: RepoKind::Github,
        token_env_var: "GITHUB_TOKEN",
        build: |config| Box::new(Github::new(config)),
    },
    ProviderRegistration {
        kind: RepoKind::BitbucketServer,
        token_env_var: "BITBUCKET_TOKEN",
        build: |config| Box::new(BitbucketServer::new(config)),
    },
];

/// Build the provider for `kind`, resolving its token with the precedence
/// flag > environment variable > failure.
pub fn create_provider(
    kind: RepoKind,
    username: &str,
    token_flag: Option<&str>,
) -> Result<Box<dyn SourceControlProvider>> {
    let registration = REGISTRY
        .iter()
        .find(|registration| registration.kind == kind)
        .ok_or_else(|| {
            NeukeeperError::invalid_config(format!(
                "no provider registered for repo type {kind:?}"
            ))
        })?;

    if username.trim().is_empty() {
        return Err(NeukeeperError::invalid_config(
            "username must be provided",
        ));
    }

    let token =
        resolve_token(token_flag, env::var(registration.token_env_var).ok())
            .ok_or_else(|| {
                NeukeeperError::invalid_config(format!(
                    "token must be passed via --repo-token or the {} environment variable",
                    registration.token_env_var
                ))
            })?;

    Ok((registration.build)(ProviderConfig {
        username: username.to_string(),
        token,
    }))
}

fn resolve_token(
    flag: Option<&str>,
    env_value: Option<String>,
) -> Option<SecretString> {
    if let Some(token) = flag
        && !token.is_empty()
    {
        return Some(SecretString::from(token.to_string()));
    }

    if let Some(token) = env_value
        && !token.is_empty()
    {
        return Some(SecretString::from(token));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn explicit_flag_wins_over_env_var() {
        let token =
            resolve_token(Some("flag-token"), Some("env-token".into()))
                .unwrap();
        assert_eq!(token.expose_secret(), "flag-token");
    }

    #[test]
    fn env_var_used_when_flag_absent() {
        let token = resolve_token(None, Some("env-token".into())).unwrap();
        assert_eq!(token.expose_secret(), "env-token");

        let token = resolve_token(Some(""), Some("env-token".into())).unwrap();
        assert_eq!(token.expose_secret(), "env-token");
    }

    #[test]
    fn missing_token_is_a_configuration_failure() {
        assert!(resolve_token(None, None).is_none());

        // registry lookup surfaces the provider-specific variable name
        let result = create_provider(RepoKind::Github, "keeper", None);
        if let Err(err) = result {
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn every_kind_has_a_registration() {
        for kind in [RepoKind::Github, RepoKind::BitbucketServer] {
            assert!(
                REGISTRY
                    .iter()
                    .any(|registration| registration.kind == kind)
            );
        }
    }

    #[test]
    fn missing_username_is_a_configuration_failure() {
        let err = create_provider(RepoKind::Github, " ", Some("token"))
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }
}
