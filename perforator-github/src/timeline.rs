//! Pull request timeline events

use chrono::{DateTime, Utc};
use perforator_core::MAX_PER_PAGE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, GitHubClient, PullRequest, Result};

#[derive(Debug, Deserialize)]
struct RawActor {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawTimelineEvent {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    actor: Option<RawActor>,
    /// Set on `reviewed` events instead of `actor`
    #[serde(default)]
    user: Option<RawActor>,
    #[serde(default)]
    requested_reviewer: Option<RawActor>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct TimelineParams {
    per_page: u32,
}

/// One event on a pull request's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Event name as GitHub reports it (`review_requested`, `reviewed`, ...)
    pub event: String,
    /// Login of whoever caused the event
    pub actor: Option<String>,
    /// Reviewer asked for, on `review_requested` events
    pub requested_reviewer: Option<String>,
    /// When the event happened
    pub created_at: Option<DateTime<Utc>>,
}

impl TimelineEvent {
    /// Whether this event requested a review from `reviewer`
    pub fn is_review_request_for(&self, reviewer: &str) -> bool {
        self.event == "review_requested"
            && self
                .requested_reviewer
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(reviewer))
    }
}

impl From<RawTimelineEvent> for TimelineEvent {
    fn from(raw: RawTimelineEvent) -> Self {
        TimelineEvent {
            event: raw.event.unwrap_or_default(),
            actor: raw.actor.or(raw.user).map(|a| a.login),
            requested_reviewer: raw.requested_reviewer.map(|a| a.login),
            created_at: raw.created_at.or(raw.submitted_at),
        }
    }
}

impl GitHubClient {
    /// Get the timeline of a pull request
    ///
    /// Reads a single page of up to 100 events.
    pub async fn get_pull_request_timeline(
        &self,
        pr: &PullRequest,
    ) -> Result<Vec<TimelineEvent>> {
        debug!(number = pr.number, "Fetching pull request timeline");

        let route = format!(
            "/repos/{}/{}/issues/{}/timeline",
            self.owner(),
            self.repo(),
            pr.number
        );
        let params = TimelineParams {
            per_page: MAX_PER_PAGE,
        };

        let events: Vec<RawTimelineEvent> = self
            .client()
            .get(route, Some(&params))
            .await
            .map_err(|e| {
                if Error::is_not_found(&e) {
                    Error::PrNotFound(pr.number)
                } else {
                    Error::from_api(e)
                }
            })?;

        Ok(events.into_iter().map(TimelineEvent::from).collect())
    }
}
