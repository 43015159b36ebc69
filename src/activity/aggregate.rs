use crate::model::{
    ActivityReport, AuthorStat, CommitRecord, RecentAuthor, TopAuthor, LEADERBOARD_SIZE,
    NO_ACTIVITY_DAYS,
};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::HashMap;

const UNKNOWN_AUTHOR: &str = "unknown";

/// First candidate that is non-blank after trimming, or `"unknown"`.
pub fn resolve_identity(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

pub fn has_multiple_parents(record: &CommitRecord) -> bool {
    record.parent_count > 1
}

pub fn message_mentions_merge(record: &CommitRecord) -> bool {
    record
        .message
        .as_deref()
        .map(|m| m.to_lowercase().contains("merge"))
        .unwrap_or(false)
}

pub fn is_merge(record: &CommitRecord) -> bool {
    has_multiple_parents(record) || message_mentions_merge(record)
}

/// Element at index `len / 2` of the ascending-sorted values, 0 when empty.
///
/// No averaging: an even count yields the element at `len / 2`, never the
/// mean of the two middle values.
pub fn lower_median(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted[sorted.len() / 2]
}

/// Whole days from `earlier` to `later`, truncated toward zero.
pub fn whole_days<A: TimeZone, B: TimeZone>(later: &DateTime<A>, earlier: &DateTime<B>) -> i64 {
    later
        .clone()
        .signed_duration_since(earlier.clone())
        .num_days()
}

/// Per-author accumulator that remembers first-seen order, so ranking ties
/// resolve the same way for the same input ordering.
#[derive(Default)]
struct AuthorTable {
    index: HashMap<String, usize>,
    stats: Vec<AuthorStat>,
}

impl AuthorTable {
    fn record(&mut self, author: String, timestamp: DateTime<FixedOffset>) {
        let slot = match self.index.get(&author) {
            Some(&slot) => slot,
            None => {
                self.index.insert(author.clone(), self.stats.len());
                self.stats.push(AuthorStat::new(author, timestamp));
                self.stats.len() - 1
            }
        };
        self.stats[slot].record(timestamp);
    }
}

/// Summarize a commit sequence relative to `now`.
///
/// The input may be empty and need not be sorted. Ties in either leaderboard
/// keep the order in which authors first appear in `records`.
pub fn aggregate<'a, I, Tz>(records: I, now: &DateTime<Tz>) -> ActivityReport
where
    I: IntoIterator<Item = &'a CommitRecord>,
    Tz: TimeZone,
{
    let mut timestamps: Vec<DateTime<FixedOffset>> = Vec::new();
    let mut authors = AuthorTable::default();
    let mut merge_commits = 0u64;

    for record in records {
        let timestamp = record.timestamp.normalize();
        timestamps.push(timestamp);

        let identity = resolve_identity(&[
            record.author_email.as_deref(),
            record.author_name.as_deref(),
        ]);
        authors.record(identity, timestamp);

        if is_merge(record) {
            merge_commits += 1;
        }
    }

    timestamps.sort();

    let days_since_last_commit = timestamps
        .last()
        .map(|last| whole_days(now, last))
        .unwrap_or(NO_ACTIVITY_DAYS);

    let gaps: Vec<i64> = timestamps
        .windows(2)
        .map(|pair| whole_days(&pair[1], &pair[0]))
        .collect();

    let mut by_volume: Vec<&AuthorStat> = authors.stats.iter().collect();
    by_volume.sort_by(|a, b| b.commits.cmp(&a.commits));
    let top_authors = by_volume
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|s| TopAuthor {
            author: s.author.clone(),
            commits: s.commits,
        })
        .collect();

    let mut by_recency: Vec<&AuthorStat> = authors.stats.iter().collect();
    by_recency.sort_by(|a, b| b.last_commit.cmp(&a.last_commit));
    let recent_authors = by_recency
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|s| RecentAuthor {
            author: s.author.clone(),
            days_since_last_commit: whole_days(now, &s.last_commit),
            commits: s.commits,
        })
        .collect();

    ActivityReport {
        commits_total: timestamps.len() as u64,
        authors_total: authors.stats.len() as u64,
        days_since_last_commit,
        median_days_between_commits: lower_median(&gaps),
        merge_commits,
        top_authors,
        recent_authors,
    }
}
