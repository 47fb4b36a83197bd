//! Issue labels command - how issues are labelled

use std::collections::HashMap;

use clap::Args;
use perforator_github::Issue;

use super::issue_author::{issue_query, plain_issues};
use super::{count_rows, parse_comma_separated, Context, CountRow, WindowArgs};
use crate::output::{print_json, print_table};

/// Count issues per label
#[derive(Args, Debug)]
pub struct IssueLabelsArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Only report these labels (comma separated)
    #[arg(long)]
    pub labels: Option<String>,

    /// Issue state: all, open, closed [default: from config, all]
    #[arg(long)]
    pub state: Option<String>,
}

/// Count plain issues per label, restricted to `labels` when non-empty
///
/// An issue with several matching labels counts once for each.
pub fn count_by_label(issues: &[Issue], labels: &[String]) -> Vec<CountRow> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for issue in plain_issues(issues, &[]) {
        for label in &issue.labels {
            let wanted = labels.is_empty() || labels.iter().any(|l| l.eq_ignore_ascii_case(label));
            if wanted {
                *counts.entry(label.clone()).or_default() += 1;
            }
        }
    }
    count_rows(counts)
}

impl IssueLabelsArgs {
    /// Execute the issue-labels command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let query = issue_query(ctx, &self.window, self.state.as_deref())?;
        let labels = self
            .labels
            .as_deref()
            .map(parse_comma_separated)
            .unwrap_or_default();
        let client = ctx.client(&self.window.repo)?;

        let issues = ctx.partial_ok(client.get_issues_by_repo(&query).await, "issues")?;
        let rows = count_by_label(&issues, &labels);

        if ctx.json {
            return print_json(&rows);
        }

        if rows.is_empty() {
            println!("No labelled issues in {}", client.full_name());
            return Ok(());
        }

        let total = plain_issues(&issues, &[]).count();
        println!(
            "Issue labels for {} ({} {} issues)",
            client.full_name(),
            total,
            query.state
        );
        println!();
        let table: Vec<Vec<String>> = rows
            .iter()
            .map(|r| vec![r.name.clone(), r.count.to_string()])
            .collect();
        print_table(&["Label", "Issues"], &table);

        Ok(())
    }
}
