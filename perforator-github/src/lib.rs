//! Perforator GitHub - GitHub integration for Perforator
//!
//! This crate provides the GitHub side of the windowed retrieval engine:
//! pull requests and issues are listed through
//! [`perforator_core::PagedFetcher`], while reviews, timelines and commits
//! are read with single requests.

mod client;
mod commits;
mod error;
mod issues;
mod pulls;
mod reviews;
mod timeline;

#[cfg(test)]
mod test_support;

pub use client::{parse_github_url, GitHubClient};
pub use commits::Commit;
pub use error::{Error, ListResult, PartialFetch, Result};
pub use issues::{Issue, IssueFilter, IssueQuery, IssueState, StateFilter};
pub use pulls::{PrState, PullRequest, PullRequestFilter};
pub use reviews::{Review, ReviewState};
pub use timeline::TimelineEvent;
