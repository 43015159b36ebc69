use super::{aggregate, output_table};
use crate::error::Result;
use crate::export::export_json;
use crate::git::GitRepo;
use crate::model::{ActivityReport, DateRange};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Commit activity of the repository at `repo` over the `since_days` days
/// ending at `now`. `now` is also the reference for every day count.
pub fn analyze_activity(repo: &Path, since_days: u32, now: DateTime<Utc>) -> Result<ActivityReport> {
    let git = GitRepo::open(Some(repo))?;
    let range = DateRange::last_days(now, since_days);
    let commits = git.collect_commits(&range)?;
    Ok(aggregate(&commits, &now))
}

pub fn exec(repo: &Path, since_days: u32, json_out: Option<&Path>) -> anyhow::Result<()> {
    let now = Utc::now();
    let report = analyze_activity(repo, since_days, now)
        .with_context(|| format!("Failed to analyze activity of {}", repo.display()))?;

    if let Some(path) = json_out {
        export_json(&report, path).context("Failed to write JSON output")?;
        println!("JSON saved to {}", path.display());
    } else {
        output_table(&report, since_days);
    }

    Ok(())
}
