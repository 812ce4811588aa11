//! Post summaries for blog index listings.
//!
//! # Invariants
//! - Projects without translations produce no summary.
//! - The first translation by language code is the summary source.

use super::collection::ProjectCollection;
use super::content::strip_tags;
use super::section::SectionKind;

const EXCERPT_MAX_CHARS: usize = 150;
const UNTITLED: &str = "Untitled";

/// Listing projection of one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    /// First `src` of the first image section.
    pub thumbnail: Option<String>,
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    /// Plain-text start of the first introduction section.
    pub excerpt: String,
    /// Upper-cased language codes.
    pub languages: Vec<String>,
}

impl ProjectCollection {
    /// Builds listing summaries for every project with a translation.
    pub fn summaries(&self) -> Vec<PostSummary> {
        self.iter()
            .filter_map(|(slug, project)| {
                let (_, first) = project.translations.iter().next()?;
                let title = match first.title.trim() {
                    "" => UNTITLED.to_string(),
                    value => value.to_string(),
                };
                let thumbnail = first
                    .sections
                    .iter()
                    .find(|section| section.kind == SectionKind::Image)
                    .and_then(|section| section.images.first())
                    .map(|entry| entry.src.clone());
                let excerpt = first
                    .sections
                    .iter()
                    .find(|section| section.kind == SectionKind::Introduction)
                    .map(|section| excerpt_of(&section.content))
                    .unwrap_or_default();

                Some(PostSummary {
                    slug: slug.clone(),
                    title,
                    thumbnail,
                    date: first.metadata.date.clone(),
                    author: first.metadata.author.clone(),
                    tags: first.metadata.tags.clone(),
                    excerpt,
                    languages: project
                        .translations
                        .keys()
                        .map(|code| code.to_ascii_uppercase())
                        .collect(),
                })
            })
            .collect()
    }
}

fn excerpt_of(content: &str) -> String {
    let text = strip_tags(content);
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let mut excerpt: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

#[cfg(test)]
mod tests {
    use crate::model::collection::ProjectCollection;
    use crate::model::section::{ImageEntry, Section, SectionKind};
    use chrono::NaiveDate;

    #[test]
    fn summary_uses_first_translation_by_code() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 4).unwrap();
        let mut collection = ProjectCollection::new();
        collection.create_project("empty").unwrap();
        collection.create_project("post").unwrap();
        let project = collection.project_mut("post").unwrap();
        project.add_language("id", "", today).unwrap();
        project.add_language("en", "", today).unwrap();
        let en = project.translation_mut("en").unwrap();
        en.title = "Hello".to_string();
        en.sections.push(Section::image(vec![ImageEntry::new("cover.png", "")]));
        en.sections.push(Section::text(
            SectionKind::Introduction,
            None,
            "<p>Short <b>intro</b></p>",
        ));

        let summaries = collection.summaries();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.slug, "post");
        assert_eq!(summary.title, "Hello");
        assert_eq!(summary.thumbnail.as_deref(), Some("cover.png"));
        assert_eq!(summary.excerpt, "Short intro...");
        assert_eq!(summary.date, "2024-04-04");
        assert_eq!(summary.languages, vec!["EN", "ID"]);
    }

    #[test]
    fn untitled_fallback_and_excerpt_limit() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 4).unwrap();
        let mut collection = ProjectCollection::new();
        collection.create_project("long").unwrap();
        let project = collection.project_mut("long").unwrap();
        project.add_language("en", "", today).unwrap();
        project
            .translation_mut("en")
            .unwrap()
            .sections
            .push(Section::text(SectionKind::Introduction, None, "x".repeat(400)));

        let summary = &collection.summaries()[0];
        assert_eq!(summary.title, "Untitled");
        assert_eq!(summary.excerpt.chars().count(), 153);
        assert!(summary.thumbnail.is_none());
    }
}
