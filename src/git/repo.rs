use crate::error::{HealthError, Result};
use crate::model::{CommitRecord, CommitTime, DateRange};
use chrono::{DateTime, FixedOffset};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        info!("Opened git repository at {}", path.display());

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every commit reachable from HEAD whose committer time falls in `range`.
    ///
    /// History outside the window is still walked so that in-range commits
    /// behind older ones are found. An unborn HEAD yields no commits, and
    /// parents missing from a shallow clone end the walk on that line.
    pub fn collect_commits(&self, range: &DateRange) -> Result<Vec<CommitRecord>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            debug!("HEAD is unborn, no history to walk");
            return Ok(Vec::new());
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Collecting commits...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let time = commit.time()?;
            let timestamp = commit_time(time.seconds, time.offset)?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            if range.contains(&timestamp) {
                let author = commit.author()?;
                let message = commit.message_raw()?;
                commits.push(CommitRecord {
                    timestamp: CommitTime::Zoned(timestamp),
                    author_email: Some(author.email.to_string()),
                    author_name: Some(author.name.to_string()),
                    parent_count: parents.len(),
                    message: Some(message.to_string()),
                });
                pb.inc(1);
            }

            for parent in parents {
                if self.repo.has_object(parent) {
                    stack.push_back(parent);
                } else {
                    debug!("Parent {} of {} is not present, treating as shallow boundary", parent, commit_id);
                }
            }
        }

        pb.finish_and_clear();
        info!("Collected {} commits from {}", commits.len(), self.path.display());
        Ok(commits)
    }
}

fn commit_time(seconds: i64, offset: i32) -> Result<DateTime<FixedOffset>> {
    let tz = FixedOffset::east_opt(offset)
        .ok_or_else(|| HealthError::InvalidDate(format!("Invalid offset: {offset}")))?;
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.with_timezone(&tz))
        .ok_or_else(|| HealthError::InvalidDate(format!("Invalid timestamp: {seconds}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_time_keeps_offset() {
        let dt = commit_time(1_700_000_000, -5 * 3600).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn open_uses_given_path_not_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let Ok(status) = std::process::Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(dir.path())
            .status()
        else {
            return;
        };
        assert!(status.success());

        let repo = GitRepo::open(Some(dir.path())).unwrap();
        assert_eq!(
            repo.path().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        let unborn = repo.collect_commits(&DateRange::default()).unwrap();
        assert!(unborn.is_empty());
    }

    #[test]
    fn commit_time_rejects_bad_offset() {
        assert!(commit_time(0, 100_000).is_err());
    }
}
