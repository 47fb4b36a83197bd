//! Issue retrieval

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::models::issues::Issue as OctocrabIssue;
use octocrab::params::{issues::Sort, Direction};
use perforator_core::{PageSource, PagedFetcher, Window};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::page_size;
use crate::{Error, GitHubClient, ListResult, PartialFetch, Result};

/// Issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl From<octocrab::models::IssueState> for IssueState {
    fn from(state: octocrab::models::IssueState) -> Self {
        match state {
            octocrab::models::IssueState::Closed => IssueState::Closed,
            _ => IssueState::Open,
        }
    }
}

/// State filter accepted by the issues endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl FromStr for StateFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StateFilter::All),
            "open" => Ok(StateFilter::Open),
            "closed" => Ok(StateFilter::Closed),
            other => Err(Error::Parse(format!(
                "Invalid state '{}'. Accepted values: all, open, closed",
                other
            ))),
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StateFilter::All => "all",
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
        };
        f.write_str(s)
    }
}

impl From<StateFilter> for octocrab::params::State {
    fn from(state: StateFilter) -> Self {
        match state {
            StateFilter::All => octocrab::params::State::All,
            StateFilter::Open => octocrab::params::State::Open,
            StateFilter::Closed => octocrab::params::State::Closed,
        }
    }
}

/// GitHub issue representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Remote ID
    pub id: u64,
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Login of the issue author
    pub author: String,
    /// Current state (open/closed)
    pub state: IssueState,
    /// Labels attached to the issue
    pub labels: Vec<String>,
    /// When the issue was created
    pub created_at: DateTime<Utc>,
    /// When the issue was closed
    pub closed_at: Option<DateTime<Utc>>,
    /// The issues endpoint also lists pull requests
    pub is_pull_request: bool,
}

impl Issue {
    /// Whether the issue carries at least one of `labels`
    pub fn has_any_label(&self, labels: &[String]) -> bool {
        self.labels
            .iter()
            .any(|l| labels.iter().any(|wanted| wanted.eq_ignore_ascii_case(l)))
    }
}

impl From<OctocrabIssue> for Issue {
    fn from(issue: OctocrabIssue) -> Self {
        Issue {
            id: issue.id.into_inner(),
            number: issue.number,
            title: issue.title,
            author: issue.user.login,
            state: issue.state.into(),
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            created_at: issue.created_at,
            closed_at: issue.closed_at,
            is_pull_request: issue.pull_request.is_some(),
        }
    }
}

/// Filter for the issue collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub state: StateFilter,
}

/// Window and filter for [`GitHubClient::get_issues_by_repo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueQuery {
    /// Number of issues to return
    pub limit: usize,
    /// Number of most recent issues to skip
    pub skip: usize,
    /// State filter
    pub state: StateFilter,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            skip: 0,
            state: StateFilter::All,
        }
    }
}

#[async_trait]
impl PageSource<IssueFilter> for GitHubClient {
    type Item = Issue;
    type Error = Error;

    async fn fetch_page(
        &self,
        filter: &IssueFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Issue>> {
        let issues = self
            .client()
            .issues(self.owner(), self.repo())
            .list()
            .state(filter.state.into())
            .sort(Sort::Created)
            .direction(Direction::Descending)
            .per_page(page_size(per_page)?)
            .page(page)
            .send()
            .await
            .map_err(Error::from_api)?;

        Ok(issues.items.into_iter().map(Issue::from).collect())
    }
}

impl GitHubClient {
    /// Get issues in the query's window, newest first
    ///
    /// The window counts pull requests too, since the issues endpoint lists
    /// them; callers filter on [`Issue::is_pull_request`]. On a remote failure
    /// the error carries the issues fetched before it.
    pub async fn get_issues_by_repo(&self, query: &IssueQuery) -> ListResult<Issue> {
        debug!(?query, "Listing issues");

        let fetcher = PagedFetcher::new(self)
            .with_label("issues")
            .with_max_page_size(self.max_per_page())
            .with_observer(self.observer());

        let plan = Window::new(query.skip, query.limit)
            .and_then(|window| fetcher.plan(window))
            .map_err(|e| PartialFetch {
                items: Vec::new(),
                source: Error::from(e),
            })?;

        let filter = IssueFilter { state: query.state };
        fetcher.fetch(&filter, plan).await
    }
}
