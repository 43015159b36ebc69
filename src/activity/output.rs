use crate::model::{ActivityReport, NO_ACTIVITY_DAYS};
use console::style;

pub fn output_table(report: &ActivityReport, since_days: u32) {
    println!(
        "{}",
        style(format!("Repository Activity (last {since_days} days)")).bold()
    );
    println!("{}", "─".repeat(50));

    let last_commit = if report.days_since_last_commit == NO_ACTIVITY_DAYS {
        style("no commits".to_string()).dim()
    } else {
        style(format!("{} days ago", report.days_since_last_commit)).cyan()
    };

    println!("{:<32} {:>16}", "Commits", style(report.commits_total).cyan());
    println!("{:<32} {:>16}", "Authors", style(report.authors_total).cyan());
    println!("{:<32} {:>16}", "Last commit", last_commit);
    println!(
        "{:<32} {:>16}",
        "Median days between commits",
        style(report.median_days_between_commits).cyan()
    );
    println!("{:<32} {:>16}", "Merge commits", style(report.merge_commits).yellow());

    if !report.top_authors.is_empty() {
        println!("\n{}", style("Top Authors").bold());
        println!("{:<40} {:>8}", style("Author").bold(), style("Commits").bold());
        println!("{}", "─".repeat(50));
        for a in &report.top_authors {
            println!("{:<40} {:>8}", a.author, a.commits);
        }
    }

    if !report.recent_authors.is_empty() {
        println!("\n{}", style("Recent Authors").bold());
        println!(
            "{:<40} {:>10} {:>8}",
            style("Author").bold(),
            style("Days ago").bold(),
            style("Commits").bold()
        );
        println!("{}", "─".repeat(60));
        for a in &report.recent_authors {
            println!(
                "{:<40} {:>10} {:>8}",
                a.author, a.days_since_last_commit, a.commits
            );
        }
    }
}
