//! Editable drafts of a translation.
//!
//! # Responsibility
//! - Load a stored translation into editor-friendly fields
//!   (`TranslationDraft::from_translation`).
//! - Collect editor fields back into a stored translation
//!   (`TranslationDraft::to_translation`), applying save-time normalization.
//!
//! # Invariants
//! - An empty or invalid date never fails collection; it is replaced by the
//!   supplied `today` and reported as a `DraftWarning`.
//! - Section identity survives a load/collect cycle.
//! - For a translation with a valid date and trimmed fields,
//!   `to_translation(from_translation(t)) == t`; section content whose body
//!   was not edited is kept verbatim, even if it is not in formatted shape.

use super::content::{format_content, join_tags, split_tags, unformat_content};
use super::section::{ImageEntry, Section, SectionId, SectionKind};
use super::translation::{Metadata, Translation};
use super::validation::{format_date, parse_date};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

/// Non-fatal normalization applied while collecting a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftWarning {
    /// Date field was empty; today's date was used.
    MissingDate { substituted: String },
    /// Date field did not parse as `YYYY-MM-DD`; today's date was used.
    InvalidDate { input: String, substituted: String },
}

impl Display for DraftWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDate { substituted } => {
                write!(f, "date is empty; using {substituted}")
            }
            Self::InvalidDate { input, substituted } => write!(
                f,
                "invalid date `{input}` (expected YYYY-MM-DD); using {substituted}"
            ),
        }
    }
}

/// Editor state of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDraft {
    pub id: SectionId,
    pub kind: SectionKind,
    pub title: String,
    /// Raw text, paragraphs separated by blank lines.
    pub body: String,
    pub images: Vec<ImageEntry>,
    /// Stored content the body was loaded from; `None` for new sections.
    pub stored_content: Option<String>,
}

impl SectionDraft {
    /// Blank draft of the default `section` kind.
    pub fn new() -> Self {
        Self {
            stored_content: None,
            ..Self::from_section(&Section::new(SectionKind::Section))
        }
    }

    pub fn from_section(section: &Section) -> Self {
        Self {
            id: section.id(),
            kind: section.kind,
            title: section.title.clone().unwrap_or_default(),
            body: unformat_content(&section.content),
            images: section.images.clone(),
            stored_content: Some(section.content.clone()),
        }
    }

    /// Collects the draft into a section.
    ///
    /// Blank titles become `None`; image entries with a blank `src` are
    /// dropped and the rest are trimmed. An unedited body keeps the stored
    /// content as is.
    pub fn to_section(&self) -> Section {
        let mut section = Section::with_id(self.id, self.kind);
        let title = self.title.trim();
        section.title = (!title.is_empty()).then(|| title.to_string());
        section.content = match &self.stored_content {
            Some(stored) if unformat_content(stored) == self.body => stored.clone(),
            _ => format_content(&self.body),
        };
        section.images = self
            .images
            .iter()
            .filter(|entry| !entry.src.trim().is_empty())
            .map(|entry| ImageEntry::new(entry.src.trim(), entry.alt_text.trim()))
            .collect();
        section
    }
}

impl Default for SectionDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Editor state of one translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationDraft {
    pub title: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub description: String,
    /// Single comma-separated field.
    pub tags: String,
    pub sections: Vec<SectionDraft>,
}

impl TranslationDraft {
    /// Loads stored data into editor fields.
    pub fn from_translation(translation: &Translation) -> Self {
        let metadata = &translation.metadata;
        Self {
            title: translation.title.clone(),
            date: metadata.date.clone(),
            author: metadata.author.clone(),
            category: metadata.category.clone(),
            description: metadata.description.clone(),
            tags: join_tags(&metadata.tags),
            sections: translation
                .sections
                .iter()
                .map(SectionDraft::from_section)
                .collect(),
        }
    }

    /// Collects editor fields into a stored translation.
    ///
    /// Returns the translation together with any date substitution warning.
    pub fn to_translation(&self, today: NaiveDate) -> (Translation, Vec<DraftWarning>) {
        let mut warnings = Vec::new();
        let date = self.collect_date(today, &mut warnings);

        let translation = Translation {
            title: self.title.trim().to_string(),
            metadata: Metadata {
                date,
                author: self.author.trim().to_string(),
                category: self.category.trim().to_string(),
                description: self.description.trim().to_string(),
                tags: split_tags(&self.tags),
            },
            sections: self.sections.iter().map(SectionDraft::to_section).collect(),
        };
        (translation, warnings)
    }

    fn collect_date(&self, today: NaiveDate, warnings: &mut Vec<DraftWarning>) -> String {
        let input = self.date.trim();
        if let Some(date) = parse_date(input) {
            return format_date(date);
        }
        let substituted = format_date(today);
        if input.is_empty() {
            warnings.push(DraftWarning::MissingDate {
                substituted: substituted.clone(),
            });
        } else {
            warnings.push(DraftWarning::InvalidDate {
                input: input.to_string(),
                substituted: substituted.clone(),
            });
        }
        substituted
    }
}
