//! Legacy schema adapter.
//!
//! # Responsibility
//! - Rewrite raw JSON documents from older editor versions into the
//!   canonical shape before typed parsing.
//!
//! # Precedence rules
//! 1. A project object with a `translations` key is canonical; its other
//!    keys are ignored.
//!    Its translation keys are normalized language codes (`EN` -> `en`);
//!    keys that are invalid or collide after normalization are errors.
//! 2. Otherwise every key of the project object is a legacy language tab
//!    name (`en - English`, `English (EN)` or a bare code) and its value is
//!    wrapped under `translations`.
//! 3. A translation without `title` takes `metadata.title`; a string
//!    `metadata.tags` is comma-split; `metadata.thumbnail` is dropped.
//! 4. An image section with `image_path`/`alt_text` and no `images` becomes
//!    a single-entry `images` list (empty path gives an empty list).
//!
//! # Invariants
//! - Canonical documents pass through unchanged.
//! - The adapter never guesses past these rules; anything else is an error.

use crate::model::content::split_tags;
use crate::model::validation::normalize_language_code;
use serde_json::{Map, Value};

/// Counters describing what the adapter rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Projects stored in the flat tab-keyed shape.
    pub legacy_projects: usize,
    /// Translations whose metadata carried legacy fields.
    pub legacy_translations: usize,
    /// Single-image sections converted to image lists.
    pub legacy_image_sections: usize,
    /// Canonical translation keys rewritten to their normalized code.
    pub normalized_language_keys: usize,
}

impl MigrationReport {
    /// Returns whether the document was already canonical.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Migrates a whole collection document (`{ projectId: project }`).
pub fn migrate_collection(root: Value, report: &mut MigrationReport) -> Result<Value, String> {
    let Value::Object(projects) = root else {
        return Err("top-level value must be an object keyed by project id".to_string());
    };
    let mut migrated = Map::with_capacity(projects.len());
    for (id, project) in projects {
        let project = migrate_project(project, report)
            .map_err(|reason| format!("project `{id}`: {reason}"))?;
        migrated.insert(id, project);
    }
    Ok(Value::Object(migrated))
}

/// Migrates one project object.
pub fn migrate_project(project: Value, report: &mut MigrationReport) -> Result<Value, String> {
    let Value::Object(mut fields) = project else {
        return Err("project must be an object".to_string());
    };

    let mut translations = Map::new();
    match fields.remove("translations") {
        Some(Value::Object(canonical)) => {
            for (key, translation) in canonical {
                let code = normalize_language_code(&key)
                    .map_err(|_| format!("invalid language code `{key}`"))?;
                if code != key {
                    report.normalized_language_keys += 1;
                }
                if translations.contains_key(&code) {
                    return Err(format!(
                        "language `{key}` collides with another key after normalization"
                    ));
                }
                translations.insert(code, migrate_translation(translation, report)?);
            }
        }
        Some(_) => return Err("`translations` must be an object".to_string()),
        None => {
            if !fields.is_empty() {
                report.legacy_projects += 1;
            }
            for (tab, translation) in fields {
                let code = language_code_from_tab(&tab)?;
                let translation = migrate_translation(translation, report)?;
                translations.entry(code).or_insert(translation);
            }
        }
    }

    let mut canonical = Map::new();
    canonical.insert("translations".to_string(), Value::Object(translations));
    Ok(Value::Object(canonical))
}

/// Returns whether a JSON value has the shape of one translation.
pub fn looks_like_translation(value: &Value) -> bool {
    value.as_object().is_some_and(|fields| {
        fields.contains_key("metadata") || fields.contains_key("sections")
    })
}

/// Extracts a language code from a legacy tab label.
pub fn language_code_from_tab(tab: &str) -> Result<String, String> {
    let tab = tab.trim();
    let candidate = if let Some((code, _)) = tab.split_once(" - ") {
        code
    } else if let (Some(open), true) = (tab.rfind('('), tab.ends_with(')')) {
        &tab[open + 1..tab.len() - 1]
    } else {
        tab
    };
    normalize_language_code(candidate).map_err(|_| format!("invalid language tab `{tab}`"))
}

fn migrate_translation(translation: Value, report: &mut MigrationReport) -> Result<Value, String> {
    let Value::Object(mut fields) = translation else {
        return Err("translation must be an object".to_string());
    };

    let mut legacy = false;
    let mut legacy_title = None;
    if let Some(Value::Object(metadata)) = fields.get_mut("metadata") {
        legacy_title = metadata.remove("title");
        if metadata.remove("thumbnail").is_some() {
            legacy = true;
        }
        let split = match metadata.get("tags") {
            Some(Value::String(tags)) => Some(split_tags(tags)),
            _ => None,
        };
        if let Some(tags) = split {
            let tags = tags.into_iter().map(Value::String).collect();
            metadata.insert("tags".to_string(), Value::Array(tags));
            legacy = true;
        }
    }
    if let Some(title) = legacy_title {
        legacy = true;
        fields.entry("title").or_insert(title);
    }
    if legacy {
        report.legacy_translations += 1;
    }

    if let Some(Value::Array(sections)) = fields.get_mut("sections") {
        for section in sections.iter_mut() {
            migrate_section(section, report);
        }
    }
    Ok(Value::Object(fields))
}

fn migrate_section(section: &mut Value, report: &mut MigrationReport) {
    let Some(fields) = section.as_object_mut() else {
        return;
    };
    let is_image = fields.get("type").and_then(Value::as_str) == Some("image");
    if !is_image || fields.contains_key("images") || !fields.contains_key("image_path") {
        return;
    }

    let src = take_string(fields, "image_path");
    let alt = take_string(fields, "alt_text");
    let mut images = Vec::new();
    if !src.trim().is_empty() {
        let mut entry = Map::new();
        entry.insert("src".to_string(), Value::String(src));
        entry.insert("altText".to_string(), Value::String(alt));
        images.push(Value::Object(entry));
    }
    fields.insert("images".to_string(), Value::Array(images));
    report.legacy_image_sections += 1;
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.remove(key) {
        Some(Value::String(value)) => value,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{language_code_from_tab, migrate_collection, MigrationReport};
    use serde_json::json;

    #[test]
    fn canonical_document_passes_through() {
        let doc = json!({
            "post": {"translations": {"en": {
                "title": "T",
                "metadata": {"date": "2024-01-01", "author": "", "category": "", "tags": ["a"]},
                "sections": [{"type": "image", "images": [{"src": "x", "altText": "y"}]}]
            }}}
        });
        let mut report = MigrationReport::default();
        let migrated = migrate_collection(doc.clone(), &mut report).unwrap();
        assert_eq!(migrated, doc);
        assert!(report.is_clean());
    }

    #[test]
    fn flat_project_is_wrapped_and_metadata_normalized() {
        let doc = json!({
            "post": {"en - English": {
                "metadata": {"title": "Legacy", "description": "d", "date": "2023-05-05",
                             "author": "A", "tags": "x, y", "thumbnail": "t.png"},
                "sections": [
                    {"type": "image", "image_path": "p.png", "alt_text": "P"},
                    {"type": "image", "image_path": "", "alt_text": ""},
                    {"type": "section", "title": "S", "content": "c"}
                ]
            }}
        });
        let mut report = MigrationReport::default();
        let migrated = migrate_collection(doc, &mut report).unwrap();
        assert_eq!(
            migrated,
            json!({"post": {"translations": {"en": {
                "metadata": {"description": "d", "date": "2023-05-05", "author": "A",
                             "tags": ["x", "y"]},
                "sections": [
                    {"type": "image", "images": [{"src": "p.png", "altText": "P"}]},
                    {"type": "image", "images": []},
                    {"type": "section", "title": "S", "content": "c"}
                ],
                "title": "Legacy"
            }}}})
        );
        assert_eq!(
            report,
            MigrationReport {
                legacy_projects: 1,
                legacy_translations: 1,
                legacy_image_sections: 2,
                normalized_language_keys: 0,
            }
        );
    }

    #[test]
    fn translations_key_takes_precedence() {
        let doc = json!({"post": {"translations": {}, "en - English": {"metadata": {}}}});
        let mut report = MigrationReport::default();
        let migrated = migrate_collection(doc, &mut report).unwrap();
        assert_eq!(migrated, json!({"post": {"translations": {}}}));
        assert_eq!(report.legacy_projects, 0);
    }

    #[test]
    fn canonical_language_keys_are_normalized() {
        let doc = json!({"post": {"translations": {" EN ": {"title": "Keep me"}}}});
        let mut report = MigrationReport::default();
        let migrated = migrate_collection(doc, &mut report).unwrap();
        assert_eq!(
            migrated,
            json!({"post": {"translations": {"en": {"title": "Keep me"}}}})
        );
        assert_eq!(report.normalized_language_keys, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn colliding_canonical_language_keys_are_rejected() {
        let doc = json!({"post": {"translations": {"en": {}, "EN": {}}}});
        let mut report = MigrationReport::default();
        let err = migrate_collection(doc, &mut report).unwrap_err();
        assert!(err.contains("collides"));

        let doc = json!({"post": {"translations": {"e n": {}}}});
        assert!(migrate_collection(doc, &mut report).is_err());
    }

    #[test]
    fn tab_labels_map_to_codes() {
        assert_eq!(language_code_from_tab("en - English").unwrap(), "en");
        assert_eq!(language_code_from_tab("Japanese (JP)").unwrap(), "jp");
        assert_eq!(language_code_from_tab("ID").unwrap(), "id");
        assert!(language_code_from_tab("Bahasa Indonesia").is_err());
    }

    #[test]
    fn non_object_root_is_rejected() {
        let mut report = MigrationReport::default();
        assert!(migrate_collection(json!([1, 2]), &mut report).is_err());
        assert!(migrate_collection(json!({"p": 3}), &mut report).is_err());
    }
}
