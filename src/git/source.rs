use crate::error::{HealthError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::info;

pub fn is_remote_url(input: &str) -> bool {
    let lower = input.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// A project location: either a local path or a shallow clone that is
/// deleted when this value is dropped.
pub enum RepoSource {
    Local(PathBuf),
    Cloned { url: String, dir: TempDir },
}

impl RepoSource {
    pub fn resolve(input: &str, auto_clone: bool) -> Result<Self> {
        if !is_remote_url(input) {
            return Ok(RepoSource::Local(PathBuf::from(input)));
        }
        if !auto_clone {
            return Err(HealthError::Clone(format!(
                "'{input}' is a remote URL and cloning is disabled"
            )));
        }
        shallow_clone(input)
    }

    pub fn path(&self) -> &Path {
        match self {
            RepoSource::Local(path) => path,
            RepoSource::Cloned { dir, .. } => dir.path(),
        }
    }

    /// What the user passed in, for messages.
    pub fn label(&self) -> String {
        match self {
            RepoSource::Local(path) => path.display().to_string(),
            RepoSource::Cloned { url, .. } => url.clone(),
        }
    }
}

fn shallow_clone(url: &str) -> Result<RepoSource> {
    let dir = tempfile::Builder::new().prefix("repohealth_clone_").tempdir()?;
    info!("Cloning {} into {}", url, dir.path().display());

    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", url])
        .arg(dir.path())
        .output()
        .map_err(|e| HealthError::Clone(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HealthError::Clone(format!(
            "git clone of '{url}' failed: {}",
            stderr.trim()
        )));
    }

    Ok(RepoSource::Cloned {
        url: url.to_string(),
        dir,
    })
}
