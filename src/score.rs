use crate::model::{ActivityReport, DependencyReport};

/// Blend activity and dependency freshness into a 0..=100 score.
///
/// Starts at 50, adds up to 30 for commit volume (one point per ten
/// commits) and up to 20 for recency, and subtracts 5 per outdated package
/// up to 30.
pub fn maintenance_score(activity: &ActivityReport, deps: &DependencyReport) -> u8 {
    let commits = i64::try_from(activity.commits_total).unwrap_or(i64::MAX);
    let days_since_last = activity.days_since_last_commit.max(0);
    let outdated = deps.packages.iter().filter(|p| p.is_outdated).count() as i64;

    let score = 50 + (commits / 10).min(30) + (20 - days_since_last.min(20)).max(0)
        - (outdated.saturating_mul(5)).min(30);
    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageInfo, NO_ACTIVITY_DAYS};

    fn activity(commits_total: u64, days_since_last_commit: i64) -> ActivityReport {
        ActivityReport {
            commits_total,
            authors_total: 0,
            days_since_last_commit,
            median_days_between_commits: 0,
            merge_commits: 0,
            top_authors: vec![],
            recent_authors: vec![],
        }
    }

    fn deps(outdated: usize, current: usize) -> DependencyReport {
        let pkg = |i: usize, is_outdated: bool| PackageInfo {
            name: format!("p{i}"),
            current_version: None,
            latest_version: None,
            is_outdated,
            vulnerabilities: vec![],
        };
        DependencyReport {
            packages: (0..outdated)
                .map(|i| pkg(i, true))
                .chain((0..current).map(|i| pkg(i + outdated, false)))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn busy_fresh_project_scores_high() {
        // 50 + 10 + 18 - 5
        assert_eq!(maintenance_score(&activity(100, 2), &deps(1, 1)), 73);
        assert_eq!(maintenance_score(&activity(1000, 0), &deps(0, 3)), 100);
    }

    #[test]
    fn inactive_project_with_stale_deps_bottoms_out() {
        assert_eq!(maintenance_score(&activity(0, NO_ACTIVITY_DAYS), &deps(10, 0)), 20);
    }

    #[test]
    fn contributions_are_capped() {
        assert_eq!(maintenance_score(&activity(5000, 50), &deps(0, 0)), 80);
        assert_eq!(maintenance_score(&activity(0, 30), &deps(6, 0)), 20);
        assert_eq!(maintenance_score(&activity(0, 30), &deps(100, 0)), 20);
    }

    #[test]
    fn future_dated_commit_counts_as_today() {
        assert_eq!(maintenance_score(&activity(0, -3), &deps(0, 0)), 70);
    }
}
