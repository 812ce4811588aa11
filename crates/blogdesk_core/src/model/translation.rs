//! Translation model: one language rendering of a post.
//!
//! # Responsibility
//! - Hold title, metadata and the ordered section list of one language.
//! - Provide ordered section insert/remove/retype operations.
//!
//! # Invariants
//! - Sections keep insertion order; positions are clamped, never rejected.
//! - `metadata.date` is stored as text; drafts enforce the date format on
//!   save (see `model::draft`).

use super::error::{ModelError, ModelResult};
use super::section::{Section, SectionId, SectionKind};
use super::validation::{format_date, parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Post metadata for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Metadata {
    /// Empty metadata dated `today`.
    pub fn dated(today: NaiveDate) -> Self {
        Self {
            date: format_date(today),
            ..Self::default()
        }
    }

    /// Returns the parsed date when the stored value is valid.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Where a new section goes in the ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionPosition {
    Top,
    #[default]
    Bottom,
    /// Clamped to the current length.
    Index(usize),
    /// Directly below the given section; falls back to the end.
    After(SectionId),
}

/// One language rendering of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Translation {
    /// Empty translation: blank title, today's date, no tags, no sections.
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            metadata: Metadata::dated(today),
            sections: Vec::new(),
        }
    }

    /// Inserts a new empty `section`-kind section and returns its id.
    pub fn add_section(&mut self, position: SectionPosition) -> SectionId {
        self.insert_section(Section::new(SectionKind::Section), position)
    }

    /// Inserts `section` at `position` and returns its id.
    pub fn insert_section(&mut self, section: Section, position: SectionPosition) -> SectionId {
        let id = section.id();
        let index = match position {
            SectionPosition::Top => 0,
            SectionPosition::Bottom => self.sections.len(),
            SectionPosition::Index(index) => index.min(self.sections.len()),
            SectionPosition::After(anchor) => self
                .position_of(anchor)
                .map(|index| index + 1)
                .unwrap_or(self.sections.len()),
        };
        self.sections.insert(index, section);
        id
    }

    /// Removes a section by identity. Absent ids are a no-op.
    pub fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        let index = self.position_of(id)?;
        Some(self.sections.remove(index))
    }

    /// Switches a section's kind, retaining its fields.
    pub fn change_section_type(&mut self, id: SectionId, kind: SectionKind) -> ModelResult<()> {
        let section = self
            .section_mut(id)
            .ok_or(ModelError::SectionNotFound(id))?;
        section.set_kind(kind);
        Ok(())
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| section.id() == id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id() == id)
    }

    /// Returns the id of the section at `index`.
    pub fn section_id_at(&self, index: usize) -> Option<SectionId> {
        self.sections.get(index).map(Section::id)
    }

    fn position_of(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|section| section.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{SectionPosition, Translation};
    use crate::model::section::{SectionId, SectionKind};
    use chrono::NaiveDate;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn empty_translation_uses_today() {
        let translation = Translation::empty(today());
        assert_eq!(translation.metadata.date, "2024-03-09");
        assert!(translation.metadata.tags.is_empty());
        assert!(translation.sections.is_empty());
    }

    #[test]
    fn sections_insert_at_requested_positions() {
        let mut translation = Translation::empty(today());
        let a = translation.add_section(SectionPosition::Bottom);
        let b = translation.add_section(SectionPosition::Top);
        let c = translation.add_section(SectionPosition::After(b));
        let d = translation.add_section(SectionPosition::Index(99));
        let order: Vec<_> = translation.sections.iter().map(|s| s.id()).collect();
        assert_eq!(order, vec![b, c, a, d]);
        assert!(translation
            .sections
            .iter()
            .all(|s| s.kind == SectionKind::Section && s.content.is_empty()));
    }

    #[test]
    fn after_unknown_anchor_appends() {
        let mut translation = Translation::empty(today());
        let first = translation.add_section(SectionPosition::Bottom);
        let second = translation.add_section(SectionPosition::After(SectionId::new()));
        assert_eq!(translation.section_id_at(0), Some(first));
        assert_eq!(translation.section_id_at(1), Some(second));
    }

    #[test]
    fn remove_section_is_noop_when_absent() {
        let mut translation = Translation::empty(today());
        let id = translation.add_section(SectionPosition::Bottom);
        assert!(translation.remove_section(SectionId::new()).is_none());
        assert!(translation.remove_section(id).is_some());
        assert!(translation.remove_section(id).is_none());
        assert!(translation.sections.is_empty());
    }

    #[test]
    fn change_type_reports_missing_section() {
        let mut translation = Translation::empty(today());
        let missing = SectionId::new();
        let err = translation
            .change_section_type(missing, SectionKind::Image)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn partial_input_defaults() {
        let translation: Translation =
            serde_json::from_value(json!({"metadata": {"author": "Rin"}})).unwrap();
        assert_eq!(translation.title, "");
        assert_eq!(translation.metadata.author, "Rin");
        assert_eq!(translation.metadata.date, "");
        assert!(translation.metadata.tags.is_empty());
        assert!(translation.sections.is_empty());
    }
}
