//! Review time command - how long reviewers take to respond

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use perforator_github::{PullRequest, Review, TimelineEvent};
use serde::Serialize;

use super::{Context, WindowArgs};
use crate::output::{format_duration, print_json, print_table};

/// How to group review time samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Time each reviewer takes
    #[default]
    Reviewer,
    /// Time each PR author waits
    Author,
}

/// Show time from review request to first review
#[derive(Args, Debug)]
pub struct ReviewTimeArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Group results by reviewer or by PR author
    #[arg(long, value_enum, default_value_t = GroupBy::Reviewer)]
    pub group_by: GroupBy,
}

/// One reviewer's first response on one PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSample {
    pub pr_number: u64,
    pub author: String,
    pub reviewer: String,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
    pub wait_secs: i64,
}

/// Aggregated review times for one reviewer or author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewTimeRow {
    pub name: String,
    pub reviews: usize,
    pub average_secs: i64,
    pub median_secs: i64,
}

/// Measure the first review of each reviewer on `pr`
///
/// The wait starts at the latest review request for that reviewer made at
/// or before the review, or at PR creation when there was none. Authors
/// commenting on their own PR are not reviewers.
pub fn samples_for_pr(
    pr: &PullRequest,
    reviews: &[Review],
    timeline: &[TimelineEvent],
) -> Vec<ReviewSample> {
    let mut first_reviews: BTreeMap<&str, DateTime<Utc>> = BTreeMap::new();
    for review in reviews {
        if review.reviewer.is_empty() || review.reviewer.eq_ignore_ascii_case(&pr.author) {
            continue;
        }
        let Some(submitted_at) = review.submitted_at else {
            continue;
        };
        first_reviews
            .entry(review.reviewer.as_str())
            .and_modify(|t| *t = (*t).min(submitted_at))
            .or_insert(submitted_at);
    }

    first_reviews
        .into_iter()
        .map(|(reviewer, reviewed_at)| {
            let requested_at = timeline
                .iter()
                .filter(|e| e.is_review_request_for(reviewer))
                .filter_map(|e| e.created_at)
                .filter(|t| *t <= reviewed_at)
                .max()
                .unwrap_or(pr.created_at);

            ReviewSample {
                pr_number: pr.number,
                author: pr.author.clone(),
                reviewer: reviewer.to_string(),
                requested_at,
                reviewed_at,
                wait_secs: (reviewed_at - requested_at).num_seconds().max(0),
            }
        })
        .collect()
}

fn median(sorted: &[i64]) -> i64 {
    match sorted.len() {
        0 => 0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2,
    }
}

/// Aggregate samples per group, slowest average first
pub fn summarize(samples: &[ReviewSample], group_by: GroupBy) -> Vec<ReviewTimeRow> {
    let mut groups: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for sample in samples {
        let key = match group_by {
            GroupBy::Reviewer => sample.reviewer.as_str(),
            GroupBy::Author => sample.author.as_str(),
        };
        groups.entry(key).or_default().push(sample.wait_secs);
    }

    let mut rows: Vec<ReviewTimeRow> = groups
        .into_iter()
        .map(|(name, mut waits)| {
            waits.sort_unstable();
            let total: i64 = waits.iter().sum();
            ReviewTimeRow {
                name: name.to_string(),
                reviews: waits.len(),
                average_secs: total / waits.len() as i64,
                median_secs: median(&waits),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.average_secs
            .cmp(&a.average_secs)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Review time rows as rendered in the console
pub(super) fn table_rows(rows: &[ReviewTimeRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.reviews.to_string(),
                format_duration(r.average_secs),
                format_duration(r.median_secs),
            ]
        })
        .collect()
}

impl ReviewTimeArgs {
    /// Execute the review-time command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let (limit, skip) = ctx.window(&self.window);
        let client = ctx.client(&self.window.repo)?;

        let prs = ctx.partial_ok(client.get_prs(limit, skip).await, "pull requests")?;

        let mut samples = Vec::new();
        for (i, pr) in prs.iter().enumerate() {
            ctx.status(&format!("Retrieving reviews.. {}/{}", i + 1, prs.len()));
            let fetched = match client.get_pull_request_reviews(pr.number).await {
                Ok(reviews) => client
                    .get_pull_request_timeline(pr)
                    .await
                    .map(|timeline| (reviews, timeline)),
                Err(e) => Err(e),
            };

            match fetched {
                Ok((reviews, timeline)) => {
                    samples.extend(samples_for_pr(pr, &reviews, &timeline));
                }
                Err(e @ perforator_github::Error::RateLimited(_)) => {
                    ctx.clear_status();
                    eprintln!("Warning: {}; reporting the first {} PR(s)", e, i);
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        number = pr.number,
                        error = %e,
                        "Skipping PR with unreadable reviews"
                    );
                }
            }
        }
        ctx.clear_status();

        let rows = summarize(&samples, self.group_by);

        if ctx.json {
            return print_json(&rows);
        }

        if rows.is_empty() {
            println!("No reviews found in {}", client.full_name());
            return Ok(());
        }

        println!(
            "Review time for {} ({} PRs, {} reviews)",
            client.full_name(),
            prs.len(),
            samples.len()
        );
        println!();
        let header = match self.group_by {
            GroupBy::Reviewer => "Reviewer",
            GroupBy::Author => "Author",
        };
        print_table(&[header, "Reviews", "Average", "Median"], &table_rows(&rows));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::rejection_rate::tests::closed_pr;
    use chrono::{Duration, TimeZone};
    use perforator_github::ReviewState;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn review(reviewer: &str, submitted_at: Option<DateTime<Utc>>) -> Review {
        Review {
            id: 1,
            reviewer: reviewer.to_string(),
            state: ReviewState::Approved,
            submitted_at,
        }
    }

    fn request(reviewer: &str, created_at: DateTime<Utc>) -> TimelineEvent {
        TimelineEvent {
            event: "review_requested".to_string(),
            actor: Some("alice".to_string()),
            requested_reviewer: Some(reviewer.to_string()),
            created_at: Some(created_at),
        }
    }

    #[test]
    fn test_wait_from_pr_creation_without_request() {
        // closed_pr is created at 09:00
        let pr = closed_pr(1, "alice", true);
        let samples = samples_for_pr(&pr, &[review("bob", Some(at(12)))], &[]);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].reviewer, "bob");
        assert_eq!(samples[0].requested_at, at(9));
        assert_eq!(samples[0].wait_secs, 3 * 3600);
    }

    #[test]
    fn test_wait_from_latest_request_before_review() {
        let pr = closed_pr(1, "alice", true);
        let timeline = vec![request("bob", at(10)), request("bob", at(11)), request("bob", at(15))];
        let samples = samples_for_pr(&pr, &[review("bob", Some(at(12)))], &timeline);

        assert_eq!(samples[0].requested_at, at(11));
        assert_eq!(samples[0].wait_secs, 3600);
    }

    #[test]
    fn test_first_review_per_reviewer_only() {
        let pr = closed_pr(1, "alice", true);
        let reviews = vec![
            review("bob", Some(at(14))),
            review("bob", Some(at(10))),
            review("alice", Some(at(10))),
            review("carol", None),
        ];
        let samples = samples_for_pr(&pr, &reviews, &[]);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].reviewed_at, at(10));
    }

    #[test]
    fn test_wait_never_negative() {
        let mut pr = closed_pr(1, "alice", true);
        pr.created_at = at(12) + Duration::minutes(5);
        let samples = samples_for_pr(&pr, &[review("bob", Some(at(12)))], &[]);
        assert_eq!(samples[0].wait_secs, 0);
    }

    #[test]
    fn test_summarize_by_reviewer_and_author() {
        let sample = |author: &str, reviewer: &str, wait_secs: i64| ReviewSample {
            pr_number: 1,
            author: author.to_string(),
            reviewer: reviewer.to_string(),
            requested_at: at(9),
            reviewed_at: at(9),
            wait_secs,
        };
        let samples = vec![
            sample("alice", "bob", 100),
            sample("alice", "bob", 300),
            sample("carol", "bob", 800),
            sample("carol", "dave", 50),
        ];

        let by_reviewer = summarize(&samples, GroupBy::Reviewer);
        assert_eq!(by_reviewer.len(), 2);
        assert_eq!(by_reviewer[0].name, "bob");
        assert_eq!(by_reviewer[0].reviews, 3);
        assert_eq!(by_reviewer[0].average_secs, 400);
        assert_eq!(by_reviewer[0].median_secs, 300);
        assert_eq!(by_reviewer[1].name, "dave");

        let by_author = summarize(&samples, GroupBy::Author);
        assert_eq!(by_author[0].name, "carol");
        assert_eq!(by_author[0].average_secs, 425);
        assert_eq!(by_author[0].median_secs, 425);
        assert_eq!(by_author[1].name, "alice");
        assert_eq!(by_author[1].average_secs, 200);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[], GroupBy::Reviewer).is_empty());
    }
}
