//! GitHub API client using octocrab

use std::sync::Arc;

use octocrab::Octocrab;
use perforator_core::{FetchObserver, GitHubConfig, NoopObserver, Secrets};
use tracing::{info, warn};

use crate::{Error, Result};

/// GitHub API client bound to one repository
pub struct GitHubClient {
    client: Octocrab,
    owner: String,
    repo: String,
    max_per_page: u32,
    observer: Arc<dyn FetchObserver>,
}

impl GitHubClient {
    /// Create a new GitHub client for the specified repository
    ///
    /// Token is loaded from (in priority order):
    /// 1. GITHUB_TOKEN environment variable
    /// 2. ~/.config/perforator/secrets.toml
    ///
    /// Without a token the client talks to GitHub anonymously, which works
    /// for public repositories under a much lower rate limit.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        config: &GitHubConfig,
    ) -> Result<Self> {
        let secrets = Secrets::load().map_err(|e| Error::Auth(e.to_string()))?;
        Self::with_token(owner, repo, config, secrets.github_token())
    }

    /// Create a client with an explicit token, or anonymous when `None`
    pub fn with_token(
        owner: impl Into<String>,
        repo: impl Into<String>,
        config: &GitHubConfig,
        token: Option<String>,
    ) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();

        let mut builder = Octocrab::builder()
            .set_connect_timeout(Some(config.timeout))
            .set_read_timeout(Some(config.timeout));

        if let Some(api_url) = &config.api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .map_err(|e| Error::Parse(format!("Invalid API URL {}: {}", api_url, e)))?;
        }

        match token {
            Some(token) => builder = builder.personal_token(token),
            None => warn!("No GitHub token found, using anonymous access"),
        }

        let client = builder
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        info!(owner = %owner, repo = %repo, "Created GitHub client");

        Ok(Self {
            client,
            owner,
            repo,
            max_per_page: config.max_per_page,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Create a GitHub client from a repository URL
    ///
    /// Supports formats:
    /// - owner/repo
    /// - https://github.com/owner/repo
    /// - git@github.com:owner/repo.git
    pub fn from_url(url: &str, config: &GitHubConfig) -> Result<Self> {
        let (owner, repo) = parse_github_url(url)?;
        Self::new(owner, repo, config)
    }

    /// Report windowed fetch progress to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    /// Page size cap for windowed fetches
    pub fn max_per_page(&self) -> u32 {
        self.max_per_page
    }

    pub(crate) fn observer(&self) -> &dyn FetchObserver {
        self.observer.as_ref()
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("max_per_page", &self.max_per_page)
            .finish_non_exhaustive()
    }
}

/// Convert a requested page size to the `u8` octocrab takes
pub(crate) fn page_size(per_page: u32) -> Result<u8> {
    u8::try_from(per_page)
        .map_err(|_| Error::InvalidWindow(format!("page size {} exceeds 255", per_page)))
}

/// Parse a GitHub URL into owner and repo
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    let url = url.trim();
    let invalid = || {
        Error::Parse(format!(
            "Invalid repository format: {}. Expected owner/repo",
            url
        ))
    };

    // Handle HTTPS URL: https://github.com/owner/repo
    if url.starts_with("https://") || url.starts_with("http://") {
        let parsed = url::Url::parse(url).map_err(|e| Error::Parse(e.to_string()))?;
        let path = parsed.path().trim_matches('/').trim_end_matches(".git");
        return split_owner_repo(path, true)
            .ok_or_else(|| Error::Parse(format!("Invalid GitHub URL path: {}", path)));
    }

    // Handle SSH URL: git@github.com:owner/repo.git
    if url.starts_with("git@") {
        let path = url
            .split_once(':')
            .map(|(_, path)| path.trim_end_matches(".git"))
            .ok_or_else(|| Error::Parse(format!("Invalid SSH URL: {}", url)))?;
        return split_owner_repo(path, true)
            .ok_or_else(|| Error::Parse(format!("Invalid SSH URL: {}", url)));
    }

    // Simple owner/repo format
    split_owner_repo(url.trim_end_matches(".git"), false).ok_or_else(invalid)
}

fn split_owner_repo(path: &str, allow_extra: bool) -> Option<(String, String)> {
    let parts: Vec<&str> = path.split('/').collect();
    let exact = parts.len() == 2;
    if !(exact || (allow_extra && parts.len() > 2)) {
        return None;
    }
    let (owner, repo) = (parts[0].trim(), parts[1].trim());
    if owner.is_empty() || repo.is_empty() || owner == ".." || repo == ".." {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}
