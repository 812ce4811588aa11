//! Best-effort version control sync of the store file.
//!
//! # Responsibility
//! - Define the `VersionSync` collaborator used after a successful save.
//! - Provide a git CLI implementation, a no-op implementation and a
//!   bounded background worker.
//!
//! # Invariants
//! - Sync never rolls back or blocks a completed local save; every failure
//!   is reported as a `SyncError` for the caller to surface as a warning.

pub mod git;
pub mod worker;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type SyncResult<T> = Result<T, SyncError>;

/// Step of the stage/commit/push sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Stage,
    Commit,
    Push,
}

impl SyncStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::Push => "push",
        }
    }
}

/// Version control sync failure.
#[derive(Debug)]
pub enum SyncError {
    /// Directory is not inside a work tree.
    NotARepository(PathBuf),
    /// The version control tool could not be started.
    ToolUnavailable(std::io::Error),
    /// A step exited unsuccessfully.
    StepFailed { stage: SyncStage, detail: String },
    /// Background queue is at capacity.
    QueueFull,
    /// Background worker has shut down.
    WorkerStopped,
}

impl SyncError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotARepository(_) => "not_a_repository",
            Self::ToolUnavailable(_) => "tool_unavailable",
            Self::StepFailed { stage, .. } => match stage {
                SyncStage::Stage => "stage_failed",
                SyncStage::Commit => "commit_failed",
                SyncStage::Push => "push_failed",
            },
            Self::QueueFull => "queue_full",
            Self::WorkerStopped => "worker_stopped",
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotARepository(path) => {
                write!(f, "not a git repository: {}", path.display())
            }
            Self::ToolUnavailable(err) => write!(f, "git is unavailable: {err}"),
            Self::StepFailed { stage, detail } => {
                write!(f, "git {} failed: {detail}", stage.as_str())
            }
            Self::QueueFull => write!(f, "sync queue is full"),
            Self::WorkerStopped => write!(f, "sync worker has stopped"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ToolUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

/// Successful sync summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub path: PathBuf,
    pub commit_message: String,
    /// `false` when the file was unchanged and only a push ran.
    pub committed: bool,
}

/// Collaborator that stages, commits and pushes one file.
pub trait VersionSync {
    fn stage_and_push(&self, path: &Path) -> SyncResult<SyncReport>;
}

impl<T: VersionSync + ?Sized> VersionSync for Box<T> {
    fn stage_and_push(&self, path: &Path) -> SyncResult<SyncReport> {
        (**self).stage_and_push(path)
    }
}

/// Sync collaborator for sessions without a repository.
///
/// Always fails with `NotARepository` so a requested push is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSync;

impl VersionSync for NoopSync {
    fn stage_and_push(&self, path: &Path) -> SyncResult<SyncReport> {
        Err(SyncError::NotARepository(path.to_path_buf()))
    }
}
