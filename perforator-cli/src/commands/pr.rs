//! PR command - review details for a single pull request

use clap::Args;
use perforator_github::{PullRequest, Review};
use serde::Serialize;

use super::review_time::{samples_for_pr, ReviewSample};
use super::Context;
use crate::output::{format_duration, print_json, print_table};

/// Show reviews and review times of one pull request
#[derive(Args, Debug)]
pub struct PrArgs {
    /// Repository (owner/repo or a GitHub URL)
    pub repo: String,

    /// Pull request number
    pub number: u64,
}

#[derive(Debug, Serialize)]
struct PrReport {
    pull_request: PullRequest,
    reviews: Vec<Review>,
    review_times: Vec<ReviewSample>,
}

fn status_line(pr: &PullRequest) -> String {
    match (pr.merged_at, pr.closed_at) {
        (Some(merged), _) => format!("merged {}", merged.format("%Y-%m-%d %H:%M")),
        (None, Some(closed)) => format!("closed without merge {}", closed.format("%Y-%m-%d %H:%M")),
        (None, None) => "open".to_string(),
    }
}

impl PrArgs {
    /// Execute the pr command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let client = ctx.client(&self.repo)?;

        ctx.status("Retrieving pull request..");
        let fetched = async {
            let pr = client.get_pull_request(self.number).await?;
            ctx.status("Retrieving reviews..");
            let reviews = client.get_pull_request_reviews(pr.number).await?;
            ctx.status("Retrieving timeline..");
            let timeline = client.get_pull_request_timeline(&pr).await?;
            Ok::<_, perforator_github::Error>((pr, reviews, timeline))
        }
        .await;
        ctx.clear_status();
        let (pr, reviews, timeline) = fetched?;

        let report = PrReport {
            review_times: samples_for_pr(&pr, &reviews, &timeline),
            pull_request: pr,
            reviews,
        };

        if ctx.json {
            return print_json(&report);
        }

        let pr = &report.pull_request;
        println!("#{} {}", pr.number, pr.title);
        println!("  Author:   {}", pr.author);
        println!("  Branch:   {} -> {}", pr.head_branch, pr.base_branch);
        println!("  Created:  {}", pr.created_at.format("%Y-%m-%d %H:%M"));
        println!("  Status:   {}", status_line(pr));
        println!();

        if report.review_times.is_empty() {
            println!("No reviews yet");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = report
            .review_times
            .iter()
            .map(|s| {
                vec![
                    s.reviewer.clone(),
                    s.requested_at.format("%Y-%m-%d %H:%M").to_string(),
                    s.reviewed_at.format("%Y-%m-%d %H:%M").to_string(),
                    format_duration(s.wait_secs),
                ]
            })
            .collect();
        print_table(&["Reviewer", "Requested", "First review", "Waited"], &rows);

        Ok(())
    }
}
