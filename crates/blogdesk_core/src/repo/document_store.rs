//! JSON document store.
//!
//! # Responsibility
//! - Load and save the whole project collection as one JSON file.
//! - Read and write single-project export documents.
//!
//! # Invariants
//! - A missing store file loads as an empty collection.
//! - Every document passes the legacy adapter before typed parsing.
//! - Loaded project ids and language codes satisfy model validation.
//! - Writes are pretty-printed UTF-8 and create missing parent directories.
//!   Writes are not atomic: a crash mid-write can leave a truncated file.

use super::migrate::{looks_like_translation, migrate_collection, migrate_project, MigrationReport};
use crate::model::collection::{ProjectCollection, ID_TIMESTAMP_FORMAT};
use crate::model::project::Project;
use crate::model::validation::{normalize_language_code, validate_project_id};
use chrono::NaiveDateTime;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default store file name.
pub const DEFAULT_STORE_FILE_NAME: &str = "blog_data.json";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure while reading or writing JSON documents.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    InvalidDocument { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } | Self::InvalidDocument { path, .. } => {
                path
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::Json { .. } => "json_failed",
            Self::InvalidDocument { .. } => "invalid_document",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "malformed JSON in `{}`: {source}", path.display())
            }
            Self::InvalidDocument { path, reason } => {
                write!(f, "invalid document `{}`: {reason}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidDocument { .. } => None,
        }
    }
}

/// Persistence contract for the project collection.
pub trait DocumentStore {
    /// Location of the backing file.
    fn path(&self) -> &Path;
    /// Loads the full collection; a missing file yields an empty one.
    fn load(&self) -> StoreResult<ProjectCollection>;
    /// Replaces the stored collection.
    fn save(&self, collection: &ProjectCollection) -> StoreResult<()>;
}

/// File-backed JSON store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentStore for JsonFileStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<ProjectCollection> {
        let started_at = Instant::now();
        let result = read_collection(&self.path);
        match &result {
            Ok((collection, report)) => {
                info!(
                    "event=store_load module=repo status=ok projects={} legacy_projects={} legacy_translations={} legacy_images={} normalized_languages={} duration_ms={}",
                    collection.len(),
                    report.legacy_projects,
                    report.legacy_translations,
                    report.legacy_image_sections,
                    report.normalized_language_keys,
                    started_at.elapsed().as_millis()
                );
                if !report.is_clean() {
                    warn!(
                        "event=store_migrate module=repo status=ok path={} note=legacy_schema_rewritten_on_next_save",
                        self.path.display()
                    );
                }
            }
            Err(err) => error!(
                "event=store_load module=repo status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result.map(|(collection, _)| collection)
    }

    fn save(&self, collection: &ProjectCollection) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = write_json(&self.path, collection);
        match &result {
            Ok(()) => info!(
                "event=store_save module=repo status=ok projects={} duration_ms={}",
                collection.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=repo status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }
}

/// Reads, migrates and validates a collection document.
pub fn read_collection(path: &Path) -> StoreResult<(ProjectCollection, MigrationReport)> {
    let mut report = MigrationReport::default();
    let Some(raw) = read_json(path)? else {
        return Ok((ProjectCollection::new(), report));
    };
    let migrated = migrate_collection(raw, &mut report).map_err(|reason| invalid(path, reason))?;
    let collection: ProjectCollection =
        serde_json::from_value(migrated).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    validate_keys(&collection).map_err(|reason| invalid(path, reason))?;
    Ok((collection, report))
}

/// Reads one project document for import.
///
/// Accepts an export document (`{ id: project }`, id from the key) or a bare
/// project (canonical or legacy flat shape, id from the file stem).
pub fn read_project_document(path: &Path) -> StoreResult<(String, Project)> {
    let raw = read_json(path)?.ok_or_else(|| StoreError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, "import file does not exist"),
    })?;
    let Value::Object(fields) = raw else {
        return Err(invalid(path, "import document must be an object"));
    };
    if fields.is_empty() {
        return Err(invalid(path, "import document is empty"));
    }

    let mut report = MigrationReport::default();
    let is_bare_project =
        fields.contains_key("translations") || fields.values().all(looks_like_translation);
    let (id, project_value) = if is_bare_project {
        (file_stem_id(path)?, Value::Object(fields))
    } else if fields.len() == 1 {
        let Some((id, value)) = fields.into_iter().next() else {
            return Err(invalid(path, "import document is empty"));
        };
        (id, value)
    } else {
        return Err(invalid(
            path,
            format!("expected exactly one project, found {}", fields.len()),
        ));
    };

    let migrated = migrate_project(project_value, &mut report)
        .map_err(|reason| invalid(path, format!("project `{id}`: {reason}")))?;
    let project: Project = serde_json::from_value(migrated).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "event=project_read module=repo status=ok languages={} legacy_projects={}",
        project.translations.len(),
        report.legacy_projects
    );
    Ok((id, project))
}

/// Writes a single-project export document `{ id: project }`.
pub fn write_project_document(path: &Path, id: &str, project: &Project) -> StoreResult<()> {
    let document: ProjectCollection = [(id.to_string(), project.clone())].into_iter().collect();
    write_json(path, &document)
}

/// Default export file name: `<id>.json`.
pub fn export_file_name(id: &str) -> String {
    format!("{id}.json")
}

/// Timestamped export file name: `<id>_<YYYYMMDD_HHMMSS>.json`.
pub fn timestamped_export_file_name(id: &str, now: NaiveDateTime) -> String {
    format!("{id}_{}.json", now.format(ID_TIMESTAMP_FORMAT))
}

fn read_json(path: &Path) -> StoreResult<Option<Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(io_error)
}

fn validate_keys(collection: &ProjectCollection) -> Result<(), String> {
    for (id, project) in collection.iter() {
        if !validate_project_id(id) {
            return Err(format!("invalid project id `{id}`"));
        }
        for code in project.translations.keys() {
            match normalize_language_code(code) {
                Ok(normalized) if normalized == *code => {}
                _ => return Err(format!("project `{id}`: invalid language code `{code}`")),
            }
        }
    }
    Ok(())
}

fn file_stem_id(path: &Path) -> StoreResult<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();
    if !validate_project_id(&stem) {
        return Err(invalid(
            path,
            format!("file name `{stem}` is not a valid project id"),
        ));
    }
    Ok(stem)
}

fn invalid(path: &Path, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidDocument {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
