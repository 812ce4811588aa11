//! Git CLI sync.
//!
//! # Responsibility
//! - Stage, commit and push the store file by invoking the `git` binary.
//!
//! # Invariants
//! - Commands run non-interactively against `repo_dir`; credentials and
//!   the remote must already be configured.
//! - No conflict handling: a rejected push is reported, never retried.

use super::{SyncError, SyncReport, SyncResult, SyncStage, VersionSync};
use chrono::{Local, NaiveDateTime};
use log::{error, info};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_COMMIT_PREFIX: &str = "feat(blog): update blog posts";

const COMMIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the commit message `<prefix> - YYYY-MM-DD HH:MM:SS`.
pub fn commit_message(prefix: &str, now: NaiveDateTime) -> String {
    format!("{prefix} - {}", now.format(COMMIT_TIMESTAMP_FORMAT))
}

/// `VersionSync` backed by the local `git` binary.
#[derive(Debug, Clone)]
pub struct GitCliSync {
    repo_dir: PathBuf,
    remote: String,
    commit_prefix: String,
}

impl GitCliSync {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote: DEFAULT_REMOTE.to_string(),
            commit_prefix: DEFAULT_COMMIT_PREFIX.to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_commit_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.commit_prefix = prefix.into();
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn ensure_work_tree(&self) -> SyncResult<()> {
        match self.git(["rev-parse", "--is-inside-work-tree"]) {
            Ok(output) if output.trim() == "true" => Ok(()),
            Err(SyncError::ToolUnavailable(err)) => Err(SyncError::ToolUnavailable(err)),
            _ => Err(SyncError::NotARepository(self.repo_dir.clone())),
        }
    }

    fn step<I, S>(&self, stage: SyncStage, args: I) -> SyncResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.git(args).map_err(|err| match err {
            SyncError::StepFailed { detail, .. } => SyncError::StepFailed { stage, detail },
            other => other,
        })
    }

    /// Returns whether `target` has staged changes.
    fn has_staged_changes(&self, target: &Path) -> SyncResult<bool> {
        let output = self.run([
            OsStr::new("diff"),
            OsStr::new("--cached"),
            OsStr::new("--quiet"),
            OsStr::new("--"),
            target.as_os_str(),
        ])?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(SyncError::StepFailed {
                stage: SyncStage::Commit,
                detail: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            }),
        }
    }

    fn run<I, S>(&self, args: I) -> SyncResult<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(SyncError::ToolUnavailable)
    }

    fn git<I, S>(&self, args: I) -> SyncResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if output.status.success() {
            return Ok(stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        let detail = if stderr.is_empty() { stdout } else { stderr };
        Err(SyncError::StepFailed {
            stage: SyncStage::Stage,
            detail,
        })
    }
}

// `git -C` resolves relative paths against the repository, not the caller.
fn absolute_path(path: &Path) -> SyncResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| SyncError::StepFailed {
            stage: SyncStage::Stage,
            detail: err.to_string(),
        })
}

impl VersionSync for GitCliSync {
    fn stage_and_push(&self, path: &Path) -> SyncResult<SyncReport> {
        let started_at = Instant::now();
        let message = commit_message(&self.commit_prefix, Local::now().naive_local());

        // An unchanged file is not committed again, but earlier local
        // commits are still pushed.
        let result = self.ensure_work_tree().and_then(|()| {
            let target = absolute_path(path)?;
            self.step(SyncStage::Stage, [OsStr::new("add"), OsStr::new("--"), target.as_os_str()])?;
            let committed = self.has_staged_changes(&target)?;
            if committed {
                self.step(SyncStage::Commit, ["commit", "-m", message.as_str()])?;
            }
            self.step(SyncStage::Push, ["push", self.remote.as_str()])?;
            Ok(committed)
        });

        match result {
            Ok(committed) => {
                info!(
                    "event=git_sync module=sync status=ok remote={} committed={} duration_ms={}",
                    self.remote,
                    committed,
                    started_at.elapsed().as_millis()
                );
                Ok(SyncReport {
                    path: path.to_path_buf(),
                    commit_message: message,
                    committed,
                })
            }
            Err(err) => {
                error!(
                    "event=git_sync module=sync status=error remote={} duration_ms={} error_code={} error={}",
                    self.remote,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{commit_message, GitCliSync, DEFAULT_COMMIT_PREFIX};
    use chrono::NaiveDate;

    #[test]
    fn commit_message_has_prefix_and_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 9, 30)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(
            commit_message(DEFAULT_COMMIT_PREFIX, now),
            "feat(blog): update blog posts - 2024-09-30 08:05:00"
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let sync = GitCliSync::new("/tmp/repo")
            .with_remote("upstream")
            .with_commit_prefix("docs: posts");
        assert_eq!(sync.remote, "upstream");
        assert_eq!(sync.commit_prefix, "docs: posts");
        assert_eq!(sync.repo_dir().to_str(), Some("/tmp/repo"));
    }
}
