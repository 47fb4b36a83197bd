//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// A windowed list that stopped part-way, with the items gathered so far
pub type PartialFetch<T> = perforator_core::PartialFetch<T, Error>;

/// Outcome of a windowed list call
pub type ListResult<T> = std::result::Result<Vec<T>, PartialFetch<T>>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Repository not found or not visible with the current token
    #[error("Repository {0} not found or not accessible")]
    RepoNotFound(String),

    /// Pull request not found
    #[error("Pull request #{0} not found")]
    PrNotFound(u64),

    /// Rate limit exceeded
    #[error("GitHub rate limit exceeded: {0}")]
    RateLimited(String),

    /// Requested window or page size cannot be fetched
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<perforator_core::Error> for Error {
    fn from(err: perforator_core::Error) -> Self {
        match err {
            perforator_core::Error::InvalidWindow(msg) => Error::InvalidWindow(msg),
            other => Error::Other(other.to_string()),
        }
    }
}

impl Error {
    /// Classify an octocrab error by the message GitHub returned with it
    pub(crate) fn from_api(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => {
                let message = source.message.to_lowercase();
                if message.contains("rate limit") {
                    Error::RateLimited(source.message.clone())
                } else if message.contains("bad credentials") {
                    Error::Auth("Invalid GitHub token".to_string())
                } else {
                    Error::Api(err)
                }
            }
            _ => Error::Api(err),
        }
    }

    /// Whether GitHub answered 404 for the request
    pub(crate) fn is_not_found(err: &octocrab::Error) -> bool {
        matches!(
            err,
            octocrab::Error::GitHub { source, .. } if source.message.contains("Not Found")
        )
    }
}
