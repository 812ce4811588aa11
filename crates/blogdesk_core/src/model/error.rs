//! Model-level error taxonomy.
//!
//! # Invariants
//! - Model errors never carry I/O or sync causes; those live in their own
//!   boundary error types.
//! - A failed model operation leaves the collection unchanged.

use super::section::SectionId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by document model operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Project id or language code fails format validation.
    InvalidId(String),
    /// Project id already present in the collection.
    DuplicateId(String),
    /// Language code already present in the project.
    DuplicateLanguage(String),
    /// Referenced project does not exist.
    ProjectNotFound(String),
    /// Referenced language does not exist in the project.
    LanguageNotFound(String),
    /// Referenced section does not exist in the translation.
    SectionNotFound(SectionId),
}

impl ModelError {
    /// Returns whether this error denotes a missing entity.
    ///
    /// Most callers treat not-found as a silent no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound(_) | Self::LanguageNotFound(_) | Self::SectionNotFound(_)
        )
    }
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "invalid identifier: `{value}`"),
            Self::DuplicateId(value) => write!(f, "project id already exists: `{value}`"),
            Self::DuplicateLanguage(value) => write!(f, "language already exists: `{value}`"),
            Self::ProjectNotFound(value) => write!(f, "project not found: `{value}`"),
            Self::LanguageNotFound(value) => write!(f, "language not found: `{value}`"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
        }
    }
}

impl Error for ModelError {}
