//! Project model: one post and its translations.
//!
//! # Responsibility
//! - Own the translations of one post, keyed by language code.
//! - Provide add/remove language operations.
//!
//! # Invariants
//! - Language codes are stored trimmed and lowercased.
//! - A project exclusively owns its translations.

use super::error::{ModelError, ModelResult};
use super::translation::Translation;
use super::validation::normalize_language_code;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const KNOWN_LANGUAGE_NAMES: &[(&str, &str)] =
    &[("id", "Indonesian"), ("en", "English"), ("jp", "Japanese")];

/// Display label of one language, e.g. `English (EN)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLabel {
    pub code: String,
    pub name: String,
}

impl LanguageLabel {
    /// Builds a label for a stored code using the built-in name table.
    ///
    /// Unknown codes fall back to the upper-cased code.
    pub fn for_code(code: &str) -> Self {
        let name = KNOWN_LANGUAGE_NAMES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| code.to_ascii_uppercase());
        Self {
            code: code.to_string(),
            name,
        }
    }
}

impl Display for LanguageLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code.to_ascii_uppercase())
    }
}

/// One blog post with its per-language translations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub translations: BTreeMap<String, Translation>,
}

impl Project {
    /// Creates a project without translations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty translation for `code`.
    ///
    /// # Errors
    /// - `InvalidId` when the code is malformed.
    /// - `DuplicateLanguage` when the code already exists.
    pub fn add_language(
        &mut self,
        code: &str,
        name: &str,
        today: NaiveDate,
    ) -> ModelResult<LanguageLabel> {
        let code = normalize_language_code(code)?;
        if self.translations.contains_key(&code) {
            return Err(ModelError::DuplicateLanguage(code));
        }
        self.translations
            .insert(code.clone(), Translation::empty(today));

        let name = name.trim();
        let label = if name.is_empty() {
            LanguageLabel::for_code(&code)
        } else {
            LanguageLabel {
                code,
                name: name.to_string(),
            }
        };
        Ok(label)
    }

    /// Removes the translation for `code`. Absent codes are a no-op.
    pub fn remove_language(&mut self, code: &str) -> Option<Translation> {
        let code = normalize_language_code(code).ok()?;
        self.translations.remove(&code)
    }

    pub fn translation(&self, code: &str) -> Option<&Translation> {
        let code = normalize_language_code(code).ok()?;
        self.translations.get(&code)
    }

    pub fn translation_mut(&mut self, code: &str) -> Option<&mut Translation> {
        let code = normalize_language_code(code).ok()?;
        self.translations.get_mut(&code)
    }

    /// Stored language codes in sorted order.
    pub fn language_codes(&self) -> Vec<String> {
        self.translations.keys().cloned().collect()
    }

    /// Display labels for the stored languages.
    pub fn languages(&self) -> Vec<LanguageLabel> {
        self.translations
            .keys()
            .map(|code| LanguageLabel::for_code(code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{LanguageLabel, Project};
    use crate::model::error::ModelError;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn add_language_creates_dated_empty_translation() {
        let mut project = Project::new();
        let label = project.add_language("EN", "English", today()).unwrap();
        assert_eq!(label.to_string(), "English (EN)");

        let translation = project.translation("en").unwrap();
        assert_eq!(translation.title, "");
        assert_eq!(translation.metadata.date, "2025-01-02");
        assert!(translation.sections.is_empty());
    }

    #[test]
    fn duplicate_language_is_case_insensitive() {
        let mut project = Project::new();
        project.add_language("en", "English", today()).unwrap();
        let err = project.add_language(" En ", "English", today()).unwrap_err();
        assert_eq!(err, ModelError::DuplicateLanguage("en".to_string()));
        assert_eq!(project.language_codes(), vec!["en"]);
    }

    #[test]
    fn remove_language_is_noop_when_absent() {
        let mut project = Project::new();
        project.add_language("id", "", today()).unwrap();
        assert!(project.remove_language("jp").is_none());
        assert!(project.remove_language("ID").is_some());
        assert!(project.translations.is_empty());
    }

    #[test]
    fn labels_fall_back_to_upper_code() {
        assert_eq!(LanguageLabel::for_code("id").to_string(), "Indonesian (ID)");
        assert_eq!(LanguageLabel::for_code("fr").to_string(), "FR (FR)");
    }
}
