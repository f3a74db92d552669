//! Custom error types for Neukeeper with improved type safety and error handling.

use thiserror::Error;

/// Main error type for Neukeeper operations.
#[derive(Error, Debug)]
pub enum NeukeeperError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Parse errors (repository URLs, branch names)
    #[error("Parse error: {0}")]
    Parse(String),

    // Network/API errors
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("API authentication failed: {0}")]
    Authentication(String),

    // Git errors
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Git URL parse error: {0}")]
    GitUrl(#[from] git_url_parse::GitUrlParseError),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    // Additional parsing errors
    #[error("Regular expression error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using NeukeeperError
pub type Result<T> = std::result::Result<T, NeukeeperError>;

impl NeukeeperError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a network error with context
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Whether this error is a configuration/validation failure, which maps
    /// to exit status 1.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for NeukeeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for NeukeeperError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Network(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    Self::Authentication(err.to_string())
                } else {
                    Self::Network(err.to_string())
                }
            } else {
                Self::Network(err.to_string())
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for NeukeeperError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::Authentication(format!("Invalid header value: {}", err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for NeukeeperError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.status_code.as_u16() == 401
                    || source.status_code.as_u16() == 403 =>
            {
                Self::Authentication(format!("GitHub API error: {}", err))
            }
            _ => Self::Network(format!("GitHub API error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = NeukeeperError::invalid_config("missing username");
        assert_eq!(err.to_string(), "Invalid configuration: missing username");

        let err = NeukeeperError::parse("bad repository url");
        assert_eq!(err.to_string(), "Parse error: bad repository url");

        let err = NeukeeperError::network("push rejected");
        assert_eq!(err.to_string(), "Network request failed: push rejected");
    }

    #[test]
    fn test_error_helpers() {
        let err = NeukeeperError::invalid_config("missing token");
        assert!(matches!(err, NeukeeperError::InvalidConfig(_)));
        assert!(err.is_configuration());

        let err = NeukeeperError::network("clone failed");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_from_conversions() {
        let url_err = url::Url::parse("not a url");
        assert!(url_err.is_err());
        let err: NeukeeperError = url_err.unwrap_err().into();
        assert!(matches!(err, NeukeeperError::Url(_)));
    }
}
