//! Editor configuration.
//!
//! # Responsibility
//! - Hold the knobs shared by the session, the store and the sync layer.
//! - Build the default collaborators from those knobs.

use crate::repo::document_store::{JsonFileStore, DEFAULT_STORE_FILE_NAME};
use crate::service::autosave::{AutosaveSchedule, DEFAULT_AUTOSAVE_INTERVAL};
use crate::sync::git::{GitCliSync, DEFAULT_COMMIT_PREFIX, DEFAULT_REMOTE};
use crate::sync::worker::DEFAULT_QUEUE_CAPACITY;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration for one editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Path of the JSON document holding every project.
    pub store_path: PathBuf,
    pub autosave_interval: Duration,
    /// Push after every explicit save.
    pub push_on_save: bool,
    /// Push after autosaves too.
    pub push_on_autosave: bool,
    pub remote: String,
    pub commit_prefix: String,
    pub sync_queue_capacity: usize,
}

impl EditorConfig {
    /// Default configuration with a custom store path.
    pub fn with_store_path(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Self::default()
        }
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.store_path.clone())
    }

    pub fn git_sync(&self, repo_dir: impl AsRef<Path>) -> GitCliSync {
        GitCliSync::new(repo_dir.as_ref())
            .with_remote(self.remote.clone())
            .with_commit_prefix(self.commit_prefix.clone())
    }

    pub fn autosave_schedule(&self) -> AutosaveSchedule {
        AutosaveSchedule::new(self.autosave_interval)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE_NAME),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            push_on_save: false,
            push_on_autosave: false,
            remote: DEFAULT_REMOTE.to_string(),
            commit_prefix: DEFAULT_COMMIT_PREFIX.to_string(),
            sync_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
