//! Commit retrieval

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

#[derive(Debug, Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
    #[serde(default)]
    author: Option<RawAccount>,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    message: String,
    #[serde(default)]
    author: Option<RawSignature>,
}

#[derive(Debug, Deserialize)]
struct RawSignature {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    login: String,
}

#[derive(Serialize)]
struct CommitParams<'a> {
    author: &'a str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
}

/// A commit on the default branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// GitHub login of the author, when the commit email maps to an account
    pub author_login: Option<String>,
    /// Author name from the commit itself
    pub author_name: Option<String>,
    /// Authored date
    pub authored_at: Option<DateTime<Utc>>,
    /// Link to the commit on GitHub
    pub html_url: Option<String>,
}

impl Commit {
    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Seven-character abbreviated SHA
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

impl From<RawCommit> for Commit {
    fn from(raw: RawCommit) -> Self {
        let (author_name, authored_at) = raw
            .commit
            .author
            .map(|sig| (sig.name, sig.date))
            .unwrap_or_default();

        Commit {
            sha: raw.sha,
            message: raw.commit.message,
            author_login: raw.author.map(|a| a.login),
            author_name,
            authored_at,
            html_url: raw.html_url,
        }
    }
}

impl GitHubClient {
    /// Get commits by `author` between `since` and `until`
    ///
    /// Makes a single request using GitHub's default page size.
    pub async fn get_commits(
        &self,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Commit>> {
        debug!(author, %since, %until, "Listing commits");

        if since > until {
            return Err(Error::Other(format!(
                "Commit range starts after it ends ({} > {})",
                since, until
            )));
        }

        let route = format!("/repos/{}/{}/commits", self.owner(), self.repo());
        let params = CommitParams {
            author,
            since,
            until,
        };

        let commits: Vec<RawCommit> = self
            .client()
            .get(route, Some(&params))
            .await
            .map_err(|e| {
                if Error::is_not_found(&e) {
                    Error::RepoNotFound(self.full_name())
                } else {
                    Error::from_api(e)
                }
            })?;

        let commits: Vec<Commit> = commits.into_iter().map(Commit::from).collect();
        info!(author, count = commits.len(), "Fetched commits");

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{error_body, mock_client, repo_path};
    use chrono::TimeZone;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    const COMMIT_JSON: &str = r#"{
        "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
        "html_url": "https://github.com/octocat/Hello-World/commit/6dcb09b",
        "commit": {
            "message": "Fix all the bugs\n\nLonger description.",
            "author": {
                "name": "Monalisa Octocat",
                "email": "m@example.com",
                "date": "2024-03-01T10:00:00Z"
            }
        },
        "author": {"login": "octocat"}
    }"#;

    #[test]
    fn test_parse_commit() {
        let raw: RawCommit = serde_json::from_str(COMMIT_JSON).unwrap();
        let commit = Commit::from(raw);

        assert_eq!(commit.short_sha(), "6dcb09b");
        assert_eq!(commit.summary(), "Fix all the bugs");
        assert_eq!(commit.author_login.as_deref(), Some("octocat"));
        assert_eq!(commit.author_name.as_deref(), Some("Monalisa Octocat"));
        assert!(commit.authored_at.is_some());
    }

    #[test]
    fn test_parse_commit_without_account() {
        let json = r#"{"sha": "abc", "commit": {"message": ""}, "author": null}"#;
        let commit = Commit::from(serde_json::from_str::<RawCommit>(json).unwrap());

        assert_eq!(commit.short_sha(), "abc");
        assert_eq!(commit.summary(), "");
        assert!(commit.author_login.is_none());
        assert!(commit.authored_at.is_none());
    }

    #[test]
    fn test_commit_params_serialize_rfc3339() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let params = CommitParams {
            author: "octocat",
            since,
            until: since + chrono::Duration::days(1),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["since"], "2024-03-01T00:00:00Z");
        assert_eq!(json["until"], "2024-03-02T00:00:00Z");
    }

    #[tokio::test]
    async fn test_get_commits_sends_author_and_range() {
        let (server, client) = mock_client().await;
        let commit: serde_json::Value = serde_json::from_str(COMMIT_JSON).unwrap();
        Mock::given(method("GET"))
            .and(path(repo_path("/commits")))
            .and(query_param("author", "octocat"))
            .and(query_param("since", "2024-03-01T00:00:00Z"))
            .and(query_param("until", "2024-03-02T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([commit])))
            .expect(1)
            .mount(&server)
            .await;

        let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let commits = client.get_commits("octocat", since, until).await.unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].short_sha(), "6dcb09b");
    }

    #[tokio::test]
    async fn test_get_commits_unknown_repo() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(path(repo_path("/commits")))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body("Not Found")))
            .mount(&server)
            .await;

        let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let err = client
            .get_commits("octocat", since, since + chrono::Duration::days(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RepoNotFound(ref name) if name == "octocat/hello"));
    }

    #[tokio::test]
    async fn test_get_commits_rejects_inverted_range() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let until = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let since = until + chrono::Duration::hours(1);
        assert!(client.get_commits("octocat", since, until).await.is_err());
    }
}
