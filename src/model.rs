use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Returned as `days_since_last_commit` when no commit was observed.
pub const NO_ACTIVITY_DAYS: i64 = 999_999;

/// Length bound for both author leaderboards.
pub const LEADERBOARD_SIZE: usize = 5;

/// A commit timestamp as delivered by a commit source, which may or may not
/// carry a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTime {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl CommitTime {
    /// Attach an explicit offset, assuming UTC for naive values.
    pub fn normalize(self) -> DateTime<FixedOffset> {
        match self {
            CommitTime::Zoned(dt) => dt,
            CommitTime::Naive(naive) => naive.and_utc().fixed_offset(),
        }
    }
}

impl From<DateTime<FixedOffset>> for CommitTime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        CommitTime::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for CommitTime {
    fn from(dt: DateTime<Utc>) -> Self {
        CommitTime::Zoned(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for CommitTime {
    fn from(naive: NaiveDateTime) -> Self {
        CommitTime::Naive(naive)
    }
}

#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub timestamp: CommitTime,
    pub author_email: Option<String>,
    pub author_name: Option<String>,
    pub parent_count: usize,
    pub message: Option<String>,
}

impl CommitRecord {
    pub fn new(timestamp: impl Into<CommitTime>) -> Self {
        Self {
            timestamp: timestamp.into(),
            author_email: None,
            author_name: None,
            parent_count: 1,
            message: None,
        }
    }

    pub fn with_author(mut self, email: Option<&str>, name: Option<&str>) -> Self {
        self.author_email = email.map(str::to_string);
        self.author_name = name.map(str::to_string);
        self
    }

    pub fn with_parents(mut self, parent_count: usize) -> Self {
        self.parent_count = parent_count;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStat {
    pub author: String,
    pub commits: u64,
    pub last_commit: DateTime<FixedOffset>,
}

impl AuthorStat {
    pub fn new(author: String, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            author,
            commits: 0,
            last_commit: timestamp,
        }
    }

    pub fn record(&mut self, timestamp: DateTime<FixedOffset>) {
        self.commits += 1;
        if timestamp > self.last_commit {
            self.last_commit = timestamp;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAuthor {
    pub author: String,
    pub commits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentAuthor {
    pub author: String,
    pub days_since_last_commit: i64,
    pub commits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub commits_total: u64,
    pub authors_total: u64,
    pub days_since_last_commit: i64,
    pub median_days_between_commits: i64,
    pub merge_commits: u64,
    pub top_authors: Vec<TopAuthor>,
    pub recent_authors: Vec<RecentAuthor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Severity {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub severity: Vec<Severity>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub current_version: Option<String>,
    pub latest_version: Option<String>,
    pub is_outdated: bool,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySummary {
    pub packages_total: u64,
    pub outdated_total: u64,
    pub vulnerable_total: u64,
}

impl DependencySummary {
    pub fn from_packages(packages: &[PackageInfo]) -> Self {
        Self {
            packages_total: packages.len() as u64,
            outdated_total: packages.iter().filter(|p| p.is_outdated).count() as u64,
            vulnerable_total: packages
                .iter()
                .filter(|p| !p.vulnerabilities.is_empty())
                .count() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub summary: DependencySummary,
    pub packages: Vec<PackageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub activity: ActivityReport,
    pub dependencies: DependencyReport,
    pub maintenance_score: u8,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    /// The window `[now - days, now]`.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Self {
        Self::new()
            .with_since(now - chrono::Duration::days(i64::from(days)))
            .with_until(now)
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn contains<Tz: chrono::TimeZone>(&self, timestamp: &DateTime<Tz>) -> bool {
        if let Some(since) = self.since {
            if *timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if *timestamp > until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn naive_time_is_treated_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let zoned = CommitTime::from(naive).normalize();
        assert_eq!(zoned.offset().local_minus_utc(), 0);
        assert_eq!(zoned, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn zoned_time_keeps_its_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(CommitTime::from(dt).normalize().offset(), &offset);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let range = DateRange::last_days(now, 10);
        assert!(range.contains(&now));
        assert!(range.contains(&(now - chrono::Duration::days(10))));
        assert!(!range.contains(&(now - chrono::Duration::days(11))));
        assert!(!range.contains(&(now + chrono::Duration::seconds(1))));
    }

    #[test]
    fn summary_counts_outdated_and_vulnerable() {
        let vuln = Vulnerability {
            id: "OSV-1".into(),
            summary: None,
            severity: vec![],
            aliases: vec![],
            references: vec![],
        };
        let packages = vec![
            PackageInfo {
                name: "a".into(),
                current_version: Some("1.0.0".into()),
                latest_version: Some("1.1.0".into()),
                is_outdated: true,
                vulnerabilities: vec![vuln],
            },
            PackageInfo {
                name: "b".into(),
                current_version: None,
                latest_version: None,
                is_outdated: false,
                vulnerabilities: vec![],
            },
        ];
        let summary = DependencySummary::from_packages(&packages);
        assert_eq!(
            summary,
            DependencySummary {
                packages_total: 2,
                outdated_total: 1,
                vulnerable_total: 1
            }
        );
    }
}
