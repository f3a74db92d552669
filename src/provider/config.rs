//! Provider connection configuration.
use clap::ValueEnum;
use secrecy::SecretString;

/// Supported source-control backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepoKind {
    Github,
    BitbucketServer,
}

/// Credentials resolved once per run and passed down by construction.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Username used for git authentication and PR authorship.
    pub username: String,
    /// Access token, resolved from the CLI flag or the provider's
    /// environment variable.
    pub token: SecretString,
}
