//! Project collection: the persisted root object.
//!
//! # Responsibility
//! - Own every project keyed by project id.
//! - Enforce id validity and uniqueness on create/rename/import.
//!
//! # Invariants
//! - Keys are unique, non-empty and pass `validate_project_id`.
//! - Failed operations leave the collection unchanged.
//! - The collection never tracks a "current" project; that is session state.

use super::error::{ModelError, ModelResult};
use super::project::Project;
use super::validation::validate_project_id;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp suffix format for renamed imports and timestamped exports.
pub const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Conflict policy when an imported project id already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Replace the existing project; the caller has confirmed.
    Override,
    /// Keep both by suffixing the imported id with a timestamp.
    RenameWithTimestamp,
}

/// All projects keyed by project id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCollection {
    projects: BTreeMap<String, Project>,
}

impl ProjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Project ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.projects.contains_key(id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Project)> {
        self.projects.iter()
    }

    /// Inserts an empty project under `id`.
    ///
    /// # Errors
    /// - `InvalidId` when `id` fails validation.
    /// - `DuplicateId` when `id` already exists.
    pub fn create_project(&mut self, id: &str) -> ModelResult<()> {
        ensure_valid_id(id)?;
        if self.contains(id) {
            return Err(ModelError::DuplicateId(id.to_string()));
        }
        self.projects.insert(id.to_string(), Project::new());
        Ok(())
    }

    /// Moves a project to a new key, preserving its content.
    ///
    /// Renaming to the same id is a no-op. The caller updates any
    /// "current project" pointer it holds.
    pub fn rename_project(&mut self, old_id: &str, new_id: &str) -> ModelResult<()> {
        if !self.contains(old_id) {
            return Err(ModelError::ProjectNotFound(old_id.to_string()));
        }
        if old_id == new_id {
            return Ok(());
        }
        ensure_valid_id(new_id)?;
        if self.contains(new_id) {
            return Err(ModelError::DuplicateId(new_id.to_string()));
        }
        if let Some(project) = self.projects.remove(old_id) {
            self.projects.insert(new_id.to_string(), project);
        }
        Ok(())
    }

    /// Removes a project. Absent ids are a no-op.
    pub fn delete_project(&mut self, id: &str) -> Option<Project> {
        self.projects.remove(id)
    }

    /// Returns a self-contained document holding only `id`.
    pub fn export_project(&self, id: &str) -> ModelResult<ProjectCollection> {
        let project = self
            .project(id)
            .ok_or_else(|| ModelError::ProjectNotFound(id.to_string()))?;
        let mut document = ProjectCollection::new();
        document.projects.insert(id.to_string(), project.clone());
        Ok(document)
    }

    /// Merges one imported project and returns the id it was stored under.
    ///
    /// `now` supplies the suffix for `ImportPolicy::RenameWithTimestamp`.
    pub fn import_project(
        &mut self,
        id: &str,
        project: Project,
        policy: ImportPolicy,
        now: NaiveDateTime,
    ) -> ModelResult<String> {
        ensure_valid_id(id)?;
        let target = match policy {
            ImportPolicy::Override => id.to_string(),
            ImportPolicy::RenameWithTimestamp if self.contains(id) => self.free_timestamped_id(id, now),
            ImportPolicy::RenameWithTimestamp => id.to_string(),
        };
        self.projects.insert(target.clone(), project);
        Ok(target)
    }

    /// Consumes the collection, yielding its entries.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Project)> {
        self.projects.into_iter()
    }

    fn free_timestamped_id(&self, id: &str, now: NaiveDateTime) -> String {
        let base = format!("{id}_{}", now.format(ID_TIMESTAMP_FORMAT));
        if !self.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or(base)
    }
}

impl FromIterator<(String, Project)> for ProjectCollection {
    fn from_iter<T: IntoIterator<Item = (String, Project)>>(iter: T) -> Self {
        Self {
            projects: iter.into_iter().collect(),
        }
    }
}

fn ensure_valid_id(id: &str) -> ModelResult<()> {
    if validate_project_id(id) {
        Ok(())
    } else {
        Err(ModelError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportPolicy, ProjectCollection};
    use crate::model::error::ModelError;
    use crate::model::project::Project;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn create_rejects_invalid_and_duplicate_ids() {
        let mut collection = ProjectCollection::new();
        assert_eq!(
            collection.create_project("a b"),
            Err(ModelError::InvalidId("a b".to_string()))
        );
        collection.create_project("demo").unwrap();
        assert_eq!(
            collection.create_project("demo"),
            Err(ModelError::DuplicateId("demo".to_string()))
        );
        assert_eq!(collection.ids(), vec!["demo"]);
    }

    #[test]
    fn create_then_delete_restores_prior_state() {
        let mut collection = ProjectCollection::new();
        collection.create_project("keep").unwrap();
        let before = collection.clone();
        collection.create_project("temp").unwrap();
        assert!(collection.delete_project("temp").is_some());
        assert_eq!(collection, before);
        assert!(collection.delete_project("temp").is_none());
    }

    #[test]
    fn rename_moves_content() {
        let mut collection = ProjectCollection::new();
        collection.create_project("old").unwrap();
        collection
            .project_mut("old")
            .unwrap()
            .add_language("en", "English", at(0, 0, 0).date())
            .unwrap();

        collection.rename_project("old", "new").unwrap();
        assert!(!collection.contains("old"));
        assert_eq!(collection.project("new").unwrap().language_codes(), vec!["en"]);
    }

    #[test]
    fn rename_validates_target() {
        let mut collection = ProjectCollection::new();
        collection.create_project("a").unwrap();
        collection.create_project("b").unwrap();
        assert_eq!(
            collection.rename_project("a", "b"),
            Err(ModelError::DuplicateId("b".to_string()))
        );
        assert_eq!(
            collection.rename_project("a", "b c"),
            Err(ModelError::InvalidId("b c".to_string()))
        );
        assert_eq!(
            collection.rename_project("zzz", "y"),
            Err(ModelError::ProjectNotFound("zzz".to_string()))
        );
        assert!(collection.rename_project("a", "a").is_ok());
        assert_eq!(collection.ids(), vec!["a", "b"]);
    }

    #[test]
    fn export_contains_only_requested_project() {
        let mut collection = ProjectCollection::new();
        collection.create_project("one").unwrap();
        collection.create_project("two").unwrap();
        let document = collection.export_project("two").unwrap();
        assert_eq!(document.ids(), vec!["two"]);
        assert!(collection.export_project("three").unwrap_err().is_not_found());
    }

    #[test]
    fn import_override_replaces_existing() {
        let mut collection = ProjectCollection::new();
        collection.create_project("post").unwrap();
        let mut incoming = Project::new();
        incoming
            .add_language("jp", "Japanese", at(0, 0, 0).date())
            .unwrap();

        let id = collection
            .import_project("post", incoming, ImportPolicy::Override, at(1, 2, 3))
            .unwrap();
        assert_eq!(id, "post");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.project("post").unwrap().language_codes(), vec!["jp"]);
    }

    #[test]
    fn import_rename_appends_timestamp_on_conflict() {
        let mut collection = ProjectCollection::new();
        collection.create_project("post").unwrap();
        let policy = ImportPolicy::RenameWithTimestamp;

        let first = collection
            .import_project("post", Project::new(), policy, at(9, 8, 7))
            .unwrap();
        assert_eq!(first, "post_20240601_090807");

        let second = collection
            .import_project("post", Project::new(), policy, at(9, 8, 7))
            .unwrap();
        assert_eq!(second, "post_20240601_090807_2");

        let fresh = collection
            .import_project("other", Project::new(), policy, at(9, 8, 7))
            .unwrap();
        assert_eq!(fresh, "other");
        assert_eq!(collection.len(), 4);
    }
}
