//! Mock GitHub server and REST payloads shared by the crate's tests

use perforator_core::GitHubConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

use crate::GitHubClient;

pub(crate) const OWNER: &str = "octocat";
pub(crate) const REPO: &str = "hello";

/// Start a mock server and a client bound to `octocat/hello` on it
pub(crate) async fn mock_client() -> (MockServer, GitHubClient) {
    let server = MockServer::start().await;
    let config = GitHubConfig {
        api_url: Some(server.uri()),
        ..Default::default()
    };
    let client = GitHubClient::with_token(OWNER, REPO, &config, Some("test-token".to_string()))
        .expect("client should build");
    (server, client)
}

/// `/repos/octocat/hello{rest}`
pub(crate) fn repo_path(rest: &str) -> String {
    format!("/repos/{}/{}{}", OWNER, REPO, rest)
}

/// A GitHub error body
pub(crate) fn error_body(message: &str) -> Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}

pub(crate) fn user_json(login: &str) -> Value {
    let api = format!("https://api.github.com/users/{}", login);
    json!({
        "login": login,
        "id": 1,
        "node_id": "MDQ6VXNlcjE=",
        "avatar_url": "https://github.com/images/error/octocat_happy.gif",
        "gravatar_id": "",
        "url": api,
        "html_url": format!("https://github.com/{}", login),
        "followers_url": format!("{}/followers", api),
        "following_url": format!("{}/following{{/other_user}}", api),
        "gists_url": format!("{}/gists{{/gist_id}}", api),
        "starred_url": format!("{}/starred{{/owner}}{{/repo}}", api),
        "subscriptions_url": format!("{}/subscriptions", api),
        "organizations_url": format!("{}/orgs", api),
        "repos_url": format!("{}/repos", api),
        "events_url": format!("{}/events{{/privacy}}", api),
        "received_events_url": format!("{}/received_events", api),
        "type": "User",
        "site_admin": false
    })
}

fn branch_json(name: &str, sha: &str) -> Value {
    json!({
        "label": format!("{}:{}", OWNER, name),
        "ref": name,
        "sha": sha,
        "user": user_json(OWNER)
    })
}

/// A closed pull request; `number` doubles as its position in the listing
pub(crate) fn pull_json(number: u64, merged: bool) -> Value {
    let url = format!("https://api.github.com/repos/{}/{}/pulls/{}", OWNER, REPO, number);
    let merged_at = if merged {
        json!("2024-03-02T09:00:00Z")
    } else {
        Value::Null
    };
    let head_sha = "6dcb09b5b57875f334f61aebed695e2e4193db5e";
    let base_sha = "7638417db6d59f3c431d3e1f261cc637155684cd";
    json!({
        "url": url,
        "id": 1000 + number,
        "node_id": format!("PR_{}", number),
        "html_url": format!("https://github.com/{}/{}/pull/{}", OWNER, REPO, number),
        "number": number,
        "state": "closed",
        "locked": false,
        "maintainer_can_modify": false,
        "title": format!("Change {}", number),
        "user": user_json("alice"),
        "body": null,
        "labels": [],
        "created_at": "2024-03-01T09:00:00Z",
        "updated_at": "2024-03-02T09:00:00Z",
        "closed_at": "2024-03-02T09:00:00Z",
        "merged_at": merged_at,
        "head": branch_json(&format!("feature-{}", number), head_sha),
        "base": branch_json("main", base_sha),
        "draft": false
    })
}

/// Pull requests at listing positions `range`
pub(crate) fn pulls_page(range: std::ops::Range<u64>) -> Value {
    Value::Array(range.map(|n| pull_json(n, n % 2 == 0)).collect())
}

fn label_json(name: &str) -> Value {
    json!({
        "id": 208045946,
        "node_id": "MDU6TGFiZWwyMDgwNDU5NDY=",
        "url": format!("https://api.github.com/repos/{}/{}/labels/{}", OWNER, REPO, name),
        "name": name,
        "description": null,
        "color": "f29513",
        "default": false
    })
}

/// An open issue, or a pull request as the issues endpoint lists it
pub(crate) fn issue_json(number: u64, labels: &[&str], is_pull_request: bool) -> Value {
    let api = format!("https://api.github.com/repos/{}/{}", OWNER, REPO);
    let html = format!("https://github.com/{}/{}", OWNER, REPO);
    let mut issue = json!({
        "id": 2000 + number,
        "node_id": format!("I_{}", number),
        "url": format!("{}/issues/{}", api, number),
        "repository_url": api,
        "labels_url": format!("{}/issues/{}/labels{{/name}}", api, number),
        "comments_url": format!("{}/issues/{}/comments", api, number),
        "events_url": format!("{}/issues/{}/events", api, number),
        "html_url": format!("{}/issues/{}", html, number),
        "number": number,
        "state": "open",
        "title": format!("Issue {}", number),
        "body": null,
        "user": user_json("bob"),
        "labels": labels.iter().map(|l| label_json(l)).collect::<Vec<_>>(),
        "assignee": null,
        "assignees": [],
        "author_association": "CONTRIBUTOR",
        "milestone": null,
        "locked": false,
        "active_lock_reason": null,
        "comments": 0,
        "closed_at": null,
        "created_at": "2024-03-01T09:00:00Z",
        "updated_at": "2024-03-01T09:00:00Z"
    });
    if is_pull_request {
        issue["pull_request"] = json!({
            "url": format!("{}/pulls/{}", api, number),
            "html_url": format!("{}/pull/{}", html, number),
            "diff_url": format!("{}/pull/{}.diff", html, number),
            "patch_url": format!("{}/pull/{}.patch", html, number)
        });
    }
    issue
}

/// A submitted review by `login`
pub(crate) fn review_json(id: u64, login: &str, state: &str, submitted_at: &str) -> Value {
    let html_url = format!(
        "https://github.com/{}/{}/pull/7#pullrequestreview-{}",
        OWNER, REPO, id
    );
    json!({
        "id": id,
        "node_id": format!("PRR_{}", id),
        "html_url": html_url,
        "user": user_json(login),
        "body": "",
        "commit_id": "ecdd80bb57125d7ba9641ffaa4d7d2c19d3f3091",
        "state": state,
        "pull_request_url": format!("https://api.github.com/repos/{}/{}/pulls/7", OWNER, REPO),
        "submitted_at": submitted_at,
        "author_association": "COLLABORATOR"
    })
}
