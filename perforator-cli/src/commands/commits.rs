//! Commits command - what an author committed on a given day

use chrono::{DateTime, Days, NaiveDate, Utc};
use clap::Args;

use super::Context;
use crate::output::{print_json, print_table};

/// List an author's commits for one day
#[derive(Args, Debug)]
pub struct CommitsArgs {
    /// Repository (owner/repo or a GitHub URL)
    pub repo: String,

    /// GitHub login of the commit author
    #[arg(short, long)]
    pub author: String,

    /// Which day to report, counted back from today (UTC)
    #[arg(short, long, default_value_t = 1)]
    pub days_ago: u64,
}

/// The UTC calendar day `days_ago` days before `today`, as `[since, until)`
pub fn day_range(
    today: NaiveDate,
    days_ago: u64,
) -> anyhow::Result<(DateTime<Utc>, DateTime<Utc>)> {
    let day = today
        .checked_sub_days(Days::new(days_ago))
        .ok_or_else(|| anyhow::anyhow!("{} days ago is out of range", days_ago))?;
    let next = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| anyhow::anyhow!("Date {} is out of range", day))?;

    let start = |d: NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .ok_or_else(|| anyhow::anyhow!("Invalid date {}", d))
    };
    Ok((start(day)?, start(next)?))
}

impl CommitsArgs {
    /// Execute the commits command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let (since, until) = day_range(Utc::now().date_naive(), self.days_ago)?;
        let client = ctx.client(&self.repo)?;

        ctx.status("Retrieving commits..");
        let commits = client.get_commits(&self.author, since, until).await;
        ctx.clear_status();
        let commits = commits?;

        if ctx.json {
            return print_json(&commits);
        }

        let day = since.date_naive();
        if commits.is_empty() {
            println!("No commits by {} in {} on {}", self.author, client.full_name(), day);
            return Ok(());
        }

        println!(
            "{} commit(s) by {} in {} on {}",
            commits.len(),
            self.author,
            client.full_name(),
            day
        );
        println!();
        let rows: Vec<Vec<String>> = commits
            .iter()
            .map(|c| {
                vec![
                    c.short_sha().to_string(),
                    c.authored_at
                        .map(|t| t.format("%H:%M").to_string())
                        .unwrap_or_default(),
                    c.summary().to_string(),
                ]
            })
            .collect();
        print_table(&["Commit", "Time", "Message"], &rows);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_range_yesterday() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (since, until) = day_range(today, 1).unwrap();

        assert_eq!(since, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_range_today() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let (since, until) = day_range(today, 0).unwrap();

        assert_eq!(since, Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_range_out_of_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(day_range(today, u64::MAX).is_err());
    }
}
