//! Rejection rate command - share of closed PRs that were never merged

use std::collections::BTreeMap;

use clap::Args;
use perforator_github::PullRequest;
use serde::Serialize;

use super::{Context, WindowArgs};
use crate::output::{format_percent, print_json, print_table};

/// Show the share of closed pull requests closed without merging
#[derive(Args, Debug)]
pub struct RejectionRateArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

/// Rejections for one PR author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRejections {
    pub author: String,
    pub closed: usize,
    pub rejected: usize,
    pub rate: f64,
}

/// Rejection figures over a window of closed PRs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionReport {
    pub closed: usize,
    pub merged: usize,
    pub rejected: usize,
    pub rate: f64,
    pub by_author: Vec<AuthorRejections>,
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Compute rejection figures over `prs`
pub fn rejection_report(prs: &[PullRequest]) -> RejectionReport {
    let mut per_author: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for pr in prs {
        let entry = per_author.entry(pr.author.as_str()).or_default();
        entry.0 += 1;
        if pr.is_rejected() {
            entry.1 += 1;
        }
    }

    let mut by_author: Vec<AuthorRejections> = per_author
        .into_iter()
        .map(|(author, (closed, rejected))| AuthorRejections {
            author: author.to_string(),
            closed,
            rejected,
            rate: ratio(rejected, closed),
        })
        .collect();
    by_author.sort_by(|a, b| b.closed.cmp(&a.closed).then_with(|| a.author.cmp(&b.author)));

    let rejected = prs.iter().filter(|pr| pr.is_rejected()).count();
    let merged = prs.iter().filter(|pr| pr.is_merged()).count();

    RejectionReport {
        closed: prs.len(),
        merged,
        rejected,
        rate: ratio(rejected, prs.len()),
        by_author,
    }
}

impl RejectionRateArgs {
    /// Execute the rejection-rate command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let (limit, skip) = ctx.window(&self.window);
        let client = ctx.client(&self.window.repo)?;

        let prs = ctx.partial_ok(client.get_prs(limit, skip).await, "pull requests")?;
        let report = rejection_report(&prs);

        if ctx.json {
            return print_json(&report);
        }

        println!("Rejection rate for {}", client.full_name());
        println!();
        println!("  Closed PRs:  {}", report.closed);
        println!("  Merged:      {}", report.merged);
        println!(
            "  Rejected:    {} ({})",
            report.rejected,
            format_percent(report.rate)
        );
        println!();

        if !report.by_author.is_empty() {
            let rows: Vec<Vec<String>> = report
                .by_author
                .iter()
                .map(|a| {
                    vec![
                        a.author.clone(),
                        a.closed.to_string(),
                        a.rejected.to_string(),
                        format_percent(a.rate),
                    ]
                })
                .collect();
            print_table(&["Author", "Closed", "Rejected", "Rate"], &rows);
        }

        Ok(())
    }
}
