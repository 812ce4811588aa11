//! Core document model and editing services for Blogdesk.
//! This crate owns every invariant of the blog post data file.

pub mod config;
pub mod logging;
pub mod model;
pub mod preview;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::EditorConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::collection::{ImportPolicy, ProjectCollection};
pub use model::content::{apply_inline_style, format_content, unformat_content, InlineStyle};
pub use model::draft::{DraftWarning, SectionDraft, TranslationDraft};
pub use model::error::{ModelError, ModelResult};
pub use model::project::{LanguageLabel, Project};
pub use model::section::{ImageEntry, Section, SectionId, SectionKind};
pub use model::summary::PostSummary;
pub use model::translation::{Metadata, SectionPosition, Translation};
pub use model::validation::{validate_date, validate_project_id};
pub use preview::html::{render_html, render_project_html};
pub use repo::document_store::{DocumentStore, JsonFileStore, StoreError, StoreResult};
pub use service::autosave::AutosaveSchedule;
pub use service::session::{
    EditorSession, Notice, NoticeLevel, SessionError, SessionResult, SyncStatus,
};
pub use sync::git::GitCliSync;
pub use sync::worker::{SyncOutcome, SyncWorker};
pub use sync::{NoopSync, SyncError, SyncReport, SyncResult, SyncStage, VersionSync};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
