//! Issue author command - who opens the issues

use std::collections::HashMap;

use clap::Args;
use perforator_github::{Issue, IssueQuery, StateFilter};

use super::{count_rows, parse_comma_separated, Context, CountRow, WindowArgs};
use crate::output::{print_json, print_table};

/// Count issues per author
#[derive(Args, Debug)]
pub struct IssueAuthorArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Only count issues with any of these labels (comma separated)
    #[arg(long)]
    pub labels: Option<String>,

    /// Issue state: all, open, closed [default: from config, all]
    #[arg(long)]
    pub state: Option<String>,
}

/// Build the issue query from window flags and an optional state flag
pub(super) fn issue_query(
    ctx: &Context,
    window: &WindowArgs,
    state: Option<&str>,
) -> anyhow::Result<IssueQuery> {
    let (limit, skip) = ctx.window(window);
    let state: StateFilter = state.unwrap_or(ctx.config.defaults.state.as_str()).parse()?;
    Ok(IssueQuery { limit, skip, state })
}

/// Issues in the window that are not pull requests and match the labels
pub(super) fn plain_issues<'a>(
    issues: &'a [Issue],
    labels: &'a [String],
) -> impl Iterator<Item = &'a Issue> + 'a {
    issues
        .iter()
        .filter(|issue| !issue.is_pull_request)
        .filter(move |issue| labels.is_empty() || issue.has_any_label(labels))
}

/// Count plain issues per author
pub fn count_by_author(issues: &[Issue], labels: &[String]) -> Vec<CountRow> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for issue in plain_issues(issues, labels) {
        *counts.entry(issue.author.clone()).or_default() += 1;
    }
    count_rows(counts)
}

impl IssueAuthorArgs {
    /// Execute the issue-author command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let query = issue_query(ctx, &self.window, self.state.as_deref())?;
        let labels = self
            .labels
            .as_deref()
            .map(parse_comma_separated)
            .unwrap_or_default();
        let client = ctx.client(&self.window.repo)?;

        let issues = ctx.partial_ok(client.get_issues_by_repo(&query).await, "issues")?;
        let rows = count_by_author(&issues, &labels);

        if ctx.json {
            return print_json(&rows);
        }

        if rows.is_empty() {
            println!("No matching issues in {}", client.full_name());
            return Ok(());
        }

        println!("Issue authors for {} ({} issues)", client.full_name(), query.state);
        println!();
        let table: Vec<Vec<String>> = rows
            .iter()
            .map(|r| vec![r.name.clone(), r.count.to_string()])
            .collect();
        print_table(&["Author", "Issues"], &table);

        Ok(())
    }
}
