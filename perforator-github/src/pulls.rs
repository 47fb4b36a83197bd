//! Pull request retrieval

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::models::pulls::PullRequest as OctocrabPR;
use octocrab::params::{pulls::Sort, Direction};
use perforator_core::{PageSource, PagedFetcher, Window};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::page_size;
use crate::{Error, GitHubClient, ListResult, PartialFetch, Result};

/// Pull request representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Remote ID
    pub id: u64,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Login of the PR author
    pub author: String,
    /// Current state (open, closed)
    pub state: PrState,
    /// When the PR was created
    pub created_at: DateTime<Utc>,
    /// When the PR was closed (merged or not)
    pub closed_at: Option<DateTime<Utc>>,
    /// When the PR was merged (if merged)
    pub merged_at: Option<DateTime<Utc>>,
    /// Head branch name
    pub head_branch: String,
    /// Base branch name
    pub base_branch: String,
}

impl PullRequest {
    /// Whether the PR was merged
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Whether the PR was closed without being merged
    pub fn is_rejected(&self) -> bool {
        self.state == PrState::Closed && !self.is_merged()
    }
}

/// PR state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

impl From<octocrab::models::IssueState> for PrState {
    fn from(state: octocrab::models::IssueState) -> Self {
        match state {
            octocrab::models::IssueState::Closed => PrState::Closed,
            _ => PrState::Open,
        }
    }
}

impl From<PrState> for octocrab::params::State {
    fn from(state: PrState) -> Self {
        match state {
            PrState::Open => octocrab::params::State::Open,
            PrState::Closed => octocrab::params::State::Closed,
        }
    }
}

impl From<OctocrabPR> for PullRequest {
    fn from(pr: OctocrabPR) -> Self {
        PullRequest {
            id: pr.id.into_inner(),
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            author: pr.user.map(|u| u.login).unwrap_or_default(),
            state: pr.state.map(PrState::from).unwrap_or(PrState::Open),
            created_at: pr.created_at.unwrap_or_else(Utc::now),
            closed_at: pr.closed_at,
            merged_at: pr.merged_at,
            head_branch: pr.head.ref_field,
            base_branch: pr.base.ref_field,
        }
    }
}

/// Filter for the pull request collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestFilter {
    pub state: PrState,
}

impl Default for PullRequestFilter {
    fn default() -> Self {
        Self {
            state: PrState::Closed,
        }
    }
}

#[async_trait]
impl PageSource<PullRequestFilter> for GitHubClient {
    type Item = PullRequest;
    type Error = Error;

    async fn fetch_page(
        &self,
        filter: &PullRequestFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequest>> {
        let prs = self
            .client()
            .pulls(self.owner(), self.repo())
            .list()
            .state(filter.state.into())
            .sort(Sort::Created)
            .direction(Direction::Descending)
            .per_page(page_size(per_page)?)
            .page(page)
            .send()
            .await
            .map_err(Error::from_api)?;

        Ok(prs.items.into_iter().map(PullRequest::from).collect())
    }
}

impl GitHubClient {
    /// Get closed pull requests in the window `[skip, skip + limit)`, newest first
    ///
    /// On a remote failure the error carries the PRs fetched before it.
    pub async fn get_prs(&self, limit: usize, skip: usize) -> ListResult<PullRequest> {
        self.get_prs_filtered(&PullRequestFilter::default(), limit, skip)
            .await
    }

    /// Get pull requests matching `filter` in the window `[skip, skip + limit)`
    pub async fn get_prs_filtered(
        &self,
        filter: &PullRequestFilter,
        limit: usize,
        skip: usize,
    ) -> ListResult<PullRequest> {
        debug!(limit, skip, state = ?filter.state, "Listing pull requests");

        let fetcher = PagedFetcher::new(self)
            .with_label("pull requests")
            .with_max_page_size(self.max_per_page())
            .with_observer(self.observer());

        let plan = Window::new(skip, limit)
            .and_then(|window| fetcher.plan(window))
            .map_err(|e| PartialFetch {
                items: Vec::new(),
                source: Error::from(e),
            })?;

        fetcher.fetch(filter, plan).await
    }

    /// Get a pull request by number
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        debug!(number, "Fetching pull request");

        let pr = self
            .client()
            .pulls(self.owner(), self.repo())
            .get(number)
            .await
            .map_err(|e| {
                if Error::is_not_found(&e) {
                    Error::PrNotFound(number)
                } else {
                    Error::from_api(e)
                }
            })?;

        Ok(pr.into())
    }
}
