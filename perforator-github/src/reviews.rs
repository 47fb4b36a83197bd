//! Pull request reviews

use chrono::{DateTime, Utc};
use perforator_core::MAX_PER_PAGE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::page_size;
use crate::{Error, GitHubClient, Result};

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Unknown,
}

impl ReviewState {
    /// Map octocrab's review state by variant name
    fn from_debug_name(name: &str) -> Self {
        match name {
            "Approved" => ReviewState::Approved,
            "ChangesRequested" => ReviewState::ChangesRequested,
            "Commented" => ReviewState::Commented,
            "Dismissed" => ReviewState::Dismissed,
            "Pending" => ReviewState::Pending,
            _ => ReviewState::Unknown,
        }
    }
}

/// A pull request review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Review ID
    pub id: u64,
    /// Login of the reviewer
    pub reviewer: String,
    /// Review verdict
    pub state: ReviewState,
    /// When the review was submitted (absent while pending)
    pub submitted_at: Option<DateTime<Utc>>,
}

impl GitHubClient {
    /// Get the reviews of a pull request
    ///
    /// Reads a single page of up to 100 reviews; later reviews of very busy
    /// PRs are not returned.
    pub async fn get_pull_request_reviews(&self, number: u64) -> Result<Vec<Review>> {
        debug!(number, "Fetching pull request reviews");

        let reviews = self
            .client()
            .pulls(self.owner(), self.repo())
            .list_reviews(number)
            .per_page(page_size(MAX_PER_PAGE)?)
            .send()
            .await
            .map_err(|e| {
                if Error::is_not_found(&e) {
                    Error::PrNotFound(number)
                } else {
                    Error::from_api(e)
                }
            })?;

        Ok(reviews
            .items
            .into_iter()
            .map(|r| Review {
                id: r.id.0,
                reviewer: r.user.map(|u| u.login).unwrap_or_default(),
                state: r
                    .state
                    .map(|s| ReviewState::from_debug_name(&format!("{:?}", s)))
                    .unwrap_or(ReviewState::Unknown),
                submitted_at: r.submitted_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{error_body, mock_client, repo_path, review_json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_review_state_from_name() {
        assert_eq!(ReviewState::from_debug_name("Approved"), ReviewState::Approved);
        assert_eq!(
            ReviewState::from_debug_name("ChangesRequested"),
            ReviewState::ChangesRequested
        );
        assert_eq!(ReviewState::from_debug_name("Open"), ReviewState::Unknown);
    }

    #[test]
    fn test_review_state_serializes_like_github() {
        let json = serde_json::to_string(&ReviewState::ChangesRequested).unwrap();
        assert_eq!(json, "\"CHANGES_REQUESTED\"");
    }

    #[tokio::test]
    async fn test_get_reviews_single_page() {
        let (server, client) = mock_client().await;
        let body = serde_json::json!([
            review_json(80, "bob", "CHANGES_REQUESTED", "2024-03-01T12:00:00Z"),
            review_json(81, "bob", "APPROVED", "2024-03-01T15:00:00Z"),
        ]);
        Mock::given(method("GET"))
            .and(path(repo_path("/pulls/7/reviews")))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let reviews = client.get_pull_request_reviews(7).await.unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id, 80);
        assert_eq!(reviews[0].reviewer, "bob");
        assert_eq!(reviews[0].state, ReviewState::ChangesRequested);
        assert_eq!(reviews[1].state, ReviewState::Approved);
        assert!(reviews[1].submitted_at.is_some());
    }

    #[tokio::test]
    async fn test_get_reviews_not_found() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(path(repo_path("/pulls/9/reviews")))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body("Not Found")))
            .mount(&server)
            .await;

        let err = client.get_pull_request_reviews(9).await.unwrap_err();
        assert!(matches!(err, Error::PrNotFound(9)), "got {:?}", err);
    }
}
