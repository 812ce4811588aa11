//! Editor session use-cases.
//!
//! # Responsibility
//! - Own the loaded collection and the current project selection.
//! - Coordinate model edits, persistence, preview and best-effort sync.
//! - Collect user-visible notices for the presentation layer.
//!
//! # Invariants
//! - Validation errors abort before any state change or write.
//! - Structural edits (new/rename/delete/import/remove language) persist
//!   immediately.
//! - A failed write never reverts the in-memory collection.
//! - After a failed load, writes are refused until `allow_overwrite` is
//!   called, so an unreadable file is never replaced by an empty one.
//! - Sync runs only after a successful write and never undoes it.

use crate::config::EditorConfig;
use crate::model::collection::{ImportPolicy, ProjectCollection};
use crate::model::draft::{DraftWarning, TranslationDraft};
use crate::model::error::ModelError;
use crate::model::project::{LanguageLabel, Project};
use crate::model::summary::PostSummary;
use crate::model::translation::Translation;
use crate::preview::html::{render_html, render_project_html};
use crate::repo::document_store::{
    read_project_document, write_project_document, DocumentStore, StoreError,
};
use crate::service::autosave::AutosaveSchedule;
use crate::sync::{SyncError, SyncReport, VersionSync};
use chrono::{Local, NaiveDateTime};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type SessionResult<T> = Result<T, SessionError>;

/// Wall clock used for dates and timestamps.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Session-level failure.
#[derive(Debug)]
pub enum SessionError {
    Model(ModelError),
    Store(StoreError),
    /// Operation needs a selected project.
    NoProjectSelected,
    /// The store failed to load and overwriting it was not confirmed.
    OverwriteBlocked(PathBuf),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NoProjectSelected => write!(f, "no project selected"),
            Self::OverwriteBlocked(path) => write!(
                f,
                "refusing to overwrite `{}`: it failed to load; confirm the overwrite first",
                path.display()
            ),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NoProjectSelected | Self::OverwriteBlocked(_) => None,
        }
    }
}

impl From<ModelError> for SessionError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-visible message produced by a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{level}] {}", self.message)
    }
}

/// Sync result attached to a successful save.
#[derive(Debug)]
pub enum SyncStatus {
    /// No push was requested.
    Skipped,
    Pushed(SyncReport),
    /// Push failed; the local save still stands.
    Failed(SyncError),
}

impl SyncStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Editing session over one document store.
pub struct EditorSession<S: DocumentStore, V: VersionSync> {
    config: EditorConfig,
    store: S,
    sync: V,
    collection: ProjectCollection,
    current: Option<String>,
    autosave: AutosaveSchedule,
    notices: Vec<Notice>,
    clock: Clock,
    load_failed: bool,
}

impl<S: DocumentStore, V: VersionSync> EditorSession<S, V> {
    /// Creates a session with an empty collection. Call `open` to load.
    pub fn new(config: EditorConfig, store: S, sync: V) -> Self {
        let autosave = config.autosave_schedule();
        Self {
            config,
            store,
            sync,
            collection: ProjectCollection::new(),
            current: None,
            autosave,
            notices: Vec::new(),
            clock: local_now,
            load_failed: false,
        }
    }

    /// Replaces the wall clock, mainly for deterministic tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    pub fn collection(&self) -> &ProjectCollection {
        &self.collection
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current
            .as_deref()
            .and_then(|id| self.collection.project(id))
    }

    pub fn summaries(&self) -> Vec<PostSummary> {
        self.collection.summaries()
    }

    /// Loads the store.
    ///
    /// Never fails: a read error leaves an empty collection, an error
    /// notice and a write guard (see `allow_overwrite`). The first project
    /// (by id) becomes the selection.
    pub fn open(&mut self) {
        match self.store.load() {
            Ok(collection) => {
                self.collection = collection;
                self.load_failed = false;
                self.notify(
                    NoticeLevel::Info,
                    format!("loaded {} project(s)", self.collection.len()),
                );
            }
            Err(err) => {
                error!(
                    "event=session_open module=service status=error path={} error={}",
                    self.store.path().display(),
                    err
                );
                self.collection = ProjectCollection::new();
                self.load_failed = true;
                self.notify(NoticeLevel::Error, format!("failed to load data: {err}"));
            }
        }
        self.current = self.collection.ids().into_iter().next();
    }

    /// Returns whether the last `open` failed and writes are still guarded.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Confirms that the unreadable store may be replaced by this session.
    pub fn allow_overwrite(&mut self) {
        if self.load_failed {
            warn!(
                "event=overwrite_confirmed module=service status=ok path={}",
                self.store.path().display()
            );
        }
        self.load_failed = false;
    }

    pub fn select_project(&mut self, id: &str) -> SessionResult<()> {
        if !self.collection.contains(id) {
            return self.fail(
                "select_project",
                ModelError::ProjectNotFound(id.to_string()).into(),
            );
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    /// Creates and selects a project, then persists.
    pub fn new_project(&mut self, id: &str) -> SessionResult<()> {
        if let Err(err) = self.collection.create_project(id) {
            return self.fail("new_project", err.into());
        }
        self.current = Some(id.to_string());
        info!("event=project_create module=service status=ok project_id={id}");
        self.notify(NoticeLevel::Info, format!("created project `{id}`"));
        self.persist("new_project")
    }

    /// Renames the selected project and keeps it selected.
    pub fn rename_current(&mut self, new_id: &str) -> SessionResult<()> {
        let old_id = self.require_current()?;
        if let Err(err) = self.collection.rename_project(&old_id, new_id) {
            return self.fail("rename_project", err.into());
        }
        self.current = Some(new_id.to_string());
        info!("event=project_rename module=service status=ok from={old_id} to={new_id}");
        self.notify(
            NoticeLevel::Info,
            format!("renamed project `{old_id}` to `{new_id}`"),
        );
        self.persist("rename_project")
    }

    /// Deletes the selected project and returns its id.
    ///
    /// The first remaining project becomes the selection.
    pub fn delete_current(&mut self) -> SessionResult<String> {
        let id = self.require_current()?;
        self.collection.delete_project(&id);
        self.current = self.collection.ids().into_iter().next();
        info!("event=project_delete module=service status=ok project_id={id}");
        self.notify(NoticeLevel::Info, format!("deleted project `{id}`"));
        self.persist("delete_project")?;
        Ok(id)
    }

    /// Adds an empty translation to the selected project.
    ///
    /// A blank `name` falls back to the built-in language table.
    pub fn add_language(&mut self, code: &str, name: &str) -> SessionResult<LanguageLabel> {
        let today = (self.clock)().date();
        let result = self
            .current_project_mut()
            .and_then(|project| {
                project
                    .add_language(code, name, today)
                    .map_err(SessionError::from)
            });
        match result {
            Ok(label) => {
                info!(
                    "event=language_add module=service status=ok language={}",
                    label.code
                );
                Ok(label)
            }
            Err(err) => self.fail("language_add", err),
        }
    }

    /// Removes a translation from the selected project.
    ///
    /// Returns `false` when the language was absent.
    pub fn remove_language(&mut self, code: &str) -> SessionResult<bool> {
        let removed = match self.current_project_mut() {
            Ok(project) => project.remove_language(code).is_some(),
            Err(err) => return self.fail("language_remove", err),
        };
        if !removed {
            return Ok(false);
        }
        info!("event=language_remove module=service status=ok language={code}");
        self.persist("language_remove")?;
        Ok(true)
    }

    /// Returns editor fields for one translation of the selected project.
    pub fn translation_draft(&self, code: &str) -> SessionResult<TranslationDraft> {
        let project = self.current_project().ok_or(SessionError::NoProjectSelected)?;
        project
            .translation(code)
            .map(TranslationDraft::from_translation)
            .ok_or_else(|| ModelError::LanguageNotFound(code.to_string()).into())
    }

    /// Stores editor fields into one translation of the selected project.
    ///
    /// Date substitutions are returned and also queued as warnings.
    pub fn apply_draft(
        &mut self,
        code: &str,
        draft: &TranslationDraft,
    ) -> SessionResult<Vec<DraftWarning>> {
        let today = (self.clock)().date();
        let (translation, warnings) = draft.to_translation(today);
        self.with_translation_mut(code, |slot| *slot = translation)?;
        for warning in &warnings {
            self.notify(NoticeLevel::Warning, format!("{code}: {warning}"));
        }
        Ok(warnings)
    }

    /// Runs an edit against one translation of the selected project.
    pub fn with_translation_mut<R>(
        &mut self,
        code: &str,
        edit: impl FnOnce(&mut Translation) -> R,
    ) -> SessionResult<R> {
        let result = self.current_project_mut().and_then(|project| {
            project
                .translation_mut(code)
                .map(edit)
                .ok_or_else(|| ModelError::LanguageNotFound(code.to_string()).into())
        });
        match result {
            Ok(value) => Ok(value),
            Err(err) => self.fail("translation_edit", err),
        }
    }

    /// Writes the collection and optionally pushes it.
    ///
    /// Pushes when `push` is set or `push_on_save` is configured.
    pub fn save(&mut self, push: bool) -> SessionResult<SyncStatus> {
        self.persist("save")?;
        self.notify(NoticeLevel::Info, "data saved");
        Ok(self.sync_if(push || self.config.push_on_save))
    }

    /// Exports the selected project as a standalone document.
    pub fn export_current(&mut self, path: &Path) -> SessionResult<()> {
        let id = self.require_current()?;
        let Some(project) = self.collection.project(&id) else {
            return self.fail("export_project", ModelError::ProjectNotFound(id).into());
        };
        if let Err(err) = write_project_document(path, &id, project) {
            return self.fail("export_project", err.into());
        }
        info!(
            "event=project_export module=service status=ok project_id={id} path={}",
            path.display()
        );
        self.notify(
            NoticeLevel::Info,
            format!("exported `{id}` to {}", path.display()),
        );
        Ok(())
    }

    /// Imports a project file, selects it and persists.
    ///
    /// Returns the id the project was stored under.
    pub fn import_file(&mut self, path: &Path, policy: ImportPolicy) -> SessionResult<String> {
        let (id, project) = match read_project_document(path) {
            Ok(entry) => entry,
            Err(err) => return self.fail("project_import", err.into()),
        };
        let now = (self.clock)();
        let stored_id = match self.collection.import_project(&id, project, policy, now) {
            Ok(stored_id) => stored_id,
            Err(err) => return self.fail("project_import", err.into()),
        };
        self.current = Some(stored_id.clone());
        info!(
            "event=project_import module=service status=ok project_id={stored_id} renamed={}",
            stored_id != id
        );
        self.notify(
            NoticeLevel::Info,
            format!("imported `{stored_id}` from {}", path.display()),
        );
        self.persist("project_import")?;
        Ok(stored_id)
    }

    /// Renders one translation of the selected project.
    pub fn preview(&self, code: &str) -> SessionResult<String> {
        let project = self.current_project().ok_or(SessionError::NoProjectSelected)?;
        project
            .translation(code)
            .map(render_html)
            .ok_or_else(|| ModelError::LanguageNotFound(code.to_string()).into())
    }

    /// Renders every translation of the selected project.
    pub fn preview_project(&self) -> SessionResult<String> {
        self.current_project()
            .map(render_project_html)
            .ok_or(SessionError::NoProjectSelected)
    }

    pub fn start_autosave(&mut self, now: Instant) {
        self.autosave.start(now);
        info!(
            "event=autosave_start module=service status=ok interval_s={}",
            self.autosave.interval().as_secs()
        );
    }

    pub fn stop_autosave(&mut self) {
        self.autosave.stop();
    }

    pub fn autosave_running(&self) -> bool {
        self.autosave.is_running()
    }

    /// Saves when the schedule is due and a project is selected.
    ///
    /// Returns `true` when a save was written. Failures become notices.
    pub fn autosave_tick(&mut self, now: Instant) -> bool {
        if !self.autosave.poll(now) || self.current.is_none() {
            return false;
        }
        if self.persist("autosave").is_err() {
            return false;
        }
        let _ = self.sync_if(self.config.push_on_autosave);
        true
    }

    /// Takes every queued notice in emission order.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn require_current(&mut self) -> SessionResult<String> {
        match self.current.clone() {
            Some(id) => Ok(id),
            None => self.fail("require_project", SessionError::NoProjectSelected),
        }
    }

    fn current_project_mut(&mut self) -> SessionResult<&mut Project> {
        let id = self.current.as_deref().ok_or(SessionError::NoProjectSelected)?;
        self.collection
            .project_mut(id)
            .ok_or_else(|| ModelError::ProjectNotFound(id.to_string()).into())
    }

    fn persist(&mut self, event: &str) -> SessionResult<()> {
        if self.load_failed {
            let err = SessionError::OverwriteBlocked(self.store.path().to_path_buf());
            self.notify(NoticeLevel::Error, err.to_string());
            error!("event={event} module=service status=error stage=persist error_code=overwrite_blocked");
            return Err(err);
        }
        match self.store.save(&self.collection) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notify(NoticeLevel::Error, format!("failed to save data: {err}"));
                error!("event={event} module=service status=error stage=persist error={err}");
                Err(err.into())
            }
        }
    }

    fn sync_if(&mut self, requested: bool) -> SyncStatus {
        if !requested {
            return SyncStatus::Skipped;
        }
        match self.sync.stage_and_push(self.store.path()) {
            Ok(report) => {
                self.notify(NoticeLevel::Info, "changes pushed");
                SyncStatus::Pushed(report)
            }
            Err(err) => {
                warn!(
                    "event=session_sync module=service status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.notify(
                    NoticeLevel::Warning,
                    format!("data saved locally but push failed: {err}"),
                );
                SyncStatus::Failed(err)
            }
        }
    }

    fn fail<T>(&mut self, event: &str, err: SessionError) -> SessionResult<T> {
        let quiet = matches!(&err, SessionError::Model(model) if model.is_not_found());
        if quiet {
            warn!("event={event} module=service status=error error={err}");
        } else {
            error!("event={event} module=service status=error error={err}");
        }
        self.notify(NoticeLevel::Error, err.to_string());
        Err(err)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }
}
