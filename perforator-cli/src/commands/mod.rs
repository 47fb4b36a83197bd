//! CLI command implementations

pub mod commits;
pub mod issue_author;
pub mod issue_labels;
pub mod pr;
pub mod rejection_rate;
pub mod review_time;

use std::sync::Arc;

use clap::Args;
use perforator_core::Config;
use perforator_github::{GitHubClient, ListResult};

use crate::progress::ConsoleProgress;

pub use commits::CommitsArgs;
pub use issue_author::IssueAuthorArgs;
pub use issue_labels::IssueLabelsArgs;
pub use pr::PrArgs;
pub use rejection_rate::RejectionRateArgs;
pub use review_time::ReviewTimeArgs;

/// Settings shared by every command
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    /// Emit JSON instead of tables
    pub json: bool,
    /// Suppress progress output
    pub quiet: bool,
}

impl Context {
    /// Connect to `repo` with console progress unless quiet
    pub fn client(&self, repo: &str) -> anyhow::Result<GitHubClient> {
        let client = GitHubClient::from_url(repo, &self.config.github)?;
        if self.quiet {
            Ok(client)
        } else {
            Ok(client.with_observer(Arc::new(ConsoleProgress)))
        }
    }

    /// Print a progress status unless quiet
    pub fn status(&self, message: &str) {
        if !self.quiet {
            ConsoleProgress::status(message);
        }
    }

    /// Erase the progress line unless quiet
    pub fn clear_status(&self) {
        if !self.quiet {
            ConsoleProgress::clear();
        }
    }

    /// Resolve the window from flags, falling back to configured defaults
    pub fn window(&self, args: &WindowArgs) -> (usize, usize) {
        (
            args.limit.unwrap_or(self.config.defaults.limit),
            args.skip.unwrap_or(self.config.defaults.skip),
        )
    }

    /// Keep partial results of a failed windowed fetch when there are any
    ///
    /// The error is reported as a warning; with nothing gathered it becomes
    /// the command's error.
    pub fn partial_ok<T>(&self, result: ListResult<T>, what: &str) -> anyhow::Result<Vec<T>> {
        self.clear_status();
        match result {
            Ok(items) => Ok(items),
            Err(partial) if partial.items.is_empty() => Err(anyhow::Error::new(partial.source)
                .context(format!("Failed to retrieve {}", what))),
            Err(partial) => {
                let (items, source) = partial.into_parts();
                tracing::warn!(
                    error = %source,
                    kept = items.len(),
                    "Retrieval of {} stopped early, reporting partial data",
                    what
                );
                eprintln!(
                    "Warning: retrieving {} failed after {} item(s): {}",
                    what,
                    items.len(),
                    source
                );
                Ok(items)
            }
        }
    }
}

/// Repository and window arguments shared by the list-based commands
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Repository (owner/repo or a GitHub URL)
    pub repo: String,

    /// Number of items to analyze [default: from config, 100]
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of most recent items to skip [default: from config, 0]
    #[arg(short, long)]
    pub skip: Option<usize>,
}

/// Split a comma separated flag value into trimmed, non-empty parts
pub fn parse_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A name with a count, sorted by count descending then name
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CountRow {
    pub name: String,
    pub count: usize,
}

/// Sort `(name, count)` pairs into report rows
pub fn count_rows(counts: impl IntoIterator<Item = (String, usize)>) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|(name, count)| CountRow { name, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use perforator_github::{Error, PartialFetch};

    fn context() -> Context {
        Context {
            config: Config::default(),
            json: false,
            quiet: true,
        }
    }

    #[test]
    fn test_parse_comma_separated() {
        assert_eq!(
            parse_comma_separated("bug, feature ,,docs"),
            vec!["bug", "feature", "docs"]
        );
        assert!(parse_comma_separated("").is_empty());
    }

    #[test]
    fn test_count_rows_sorted() {
        let rows = count_rows(vec![
            ("b".to_string(), 2),
            ("a".to_string(), 2),
            ("c".to_string(), 5),
        ]);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_window_defaults_from_config() {
        let mut ctx = context();
        ctx.config.defaults.limit = 42;
        let args = WindowArgs {
            repo: "o/r".to_string(),
            limit: None,
            skip: Some(5),
        };
        assert_eq!(ctx.window(&args), (42, 5));
    }

    #[test]
    fn test_partial_ok_keeps_gathered_items() {
        let result: ListResult<u32> = Err(PartialFetch {
            items: vec![1, 2],
            source: Error::RateLimited("slow down".to_string()),
        });
        assert_eq!(context().partial_ok(result, "items").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_partial_ok_fails_when_nothing_gathered() {
        let result: ListResult<u32> = Err(PartialFetch {
            items: vec![],
            source: Error::RateLimited("slow down".to_string()),
        });
        let err = context().partial_ok(result, "items").unwrap_err();
        assert!(err.to_string().contains("Failed to retrieve items"));
    }
}
