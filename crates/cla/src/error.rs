//! Error types for the CLA reconciler.

use thiserror::Error;

/// Errors returned by a [`GitHubClient`](crate::github::GitHubClient).
///
/// The reconciler never propagates these; they are logged and absorbed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with an error status
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API base URL is unusable
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// GitHub answered with a status the operation has no meaning for
    #[error("Unexpected status {status} from {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading or validating a [`ClaConfig`](crate::ClaConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting was provided but is unusable
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for this schema
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
