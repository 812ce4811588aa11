//! Post section model.
//!
//! # Responsibility
//! - Define the section tagged union stored inside a translation.
//! - Keep text and image fields across kind switches during a session.
//!
//! # Invariants
//! - `kind` is always one of the enumerated section kinds; unknown `type`
//!   tags are rejected on deserialization.
//! - Only the fields relevant to `kind` are serialized.
//! - `SectionId` is session-local: never persisted, regenerated on load.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Session-local identity of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(Uuid);

impl SectionId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Variant tag of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Introduction,
    #[default]
    Section,
    Disclaimer,
    Footnote,
    Image,
}

impl SectionKind {
    /// All kinds in editor display order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Introduction,
        SectionKind::Section,
        SectionKind::Disclaimer,
        SectionKind::Footnote,
        SectionKind::Image,
    ];

    /// Returns the persisted tag string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::Section => "section",
            Self::Disclaimer => "disclaimer",
            Self::Footnote => "footnote",
            Self::Image => "image",
        }
    }

    /// Parses a tag string, case-insensitive and trimmed.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "introduction" => Some(Self::Introduction),
            "section" => Some(Self::Section),
            "disclaimer" => Some(Self::Disclaimer),
            "footnote" => Some(Self::Footnote),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn is_image(self) -> bool {
        self == Self::Image
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image reference inside an image section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub src: String,
    #[serde(rename = "altText", default)]
    pub alt_text: String,
}

impl ImageEntry {
    pub fn new(src: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt_text: alt_text.into(),
        }
    }
}

/// One ordered block of a translation.
///
/// Text fields and image entries are both kept in memory whatever the
/// current `kind` is, so switching kinds back and forth is lossless within
/// a session. Equality compares the persisted view only: the session id and
/// fields hidden by the current kind are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SectionRecord", into = "SectionRecord")]
pub struct Section {
    id: SectionId,
    pub kind: SectionKind,
    /// Optional sub-heading for text kinds.
    pub title: Option<String>,
    /// HTML-ish markup for text kinds.
    pub content: String,
    /// Ordered images for `SectionKind::Image`.
    pub images: Vec<ImageEntry>,
}

impl Section {
    /// Creates an empty section of the given kind.
    pub fn new(kind: SectionKind) -> Self {
        Self::with_id(SectionId::new(), kind)
    }

    /// Creates a text section.
    pub fn text(kind: SectionKind, title: Option<String>, content: impl Into<String>) -> Self {
        let mut section = Self::new(kind);
        section.title = title;
        section.content = content.into();
        section
    }

    /// Creates an image section with ordered entries.
    pub fn image(images: Vec<ImageEntry>) -> Self {
        let mut section = Self::new(SectionKind::Image);
        section.images = images;
        section
    }

    pub(crate) fn with_id(id: SectionId, kind: SectionKind) -> Self {
        Self {
            id,
            kind,
            title: None,
            content: String::new(),
            images: Vec::new(),
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Switches the variant tag, retaining every field.
    pub fn set_kind(&mut self, kind: SectionKind) {
        self.kind = kind;
    }

    pub fn is_image(&self) -> bool {
        self.kind.is_image()
    }

    /// Returns the sub-heading when present and not blank.
    pub fn visible_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Appends one image entry.
    pub fn add_image_entry(&mut self, entry: ImageEntry) {
        self.images.push(entry);
    }

    /// Removes the last image entry; the final remaining entry is kept.
    pub fn remove_last_image_entry(&mut self) -> Option<ImageEntry> {
        if self.images.len() <= 1 {
            return None;
        }
        self.images.pop()
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if self.kind.is_image() {
            self.images == other.images
        } else {
            self.title == other.title && self.content == other.content
        }
    }
}

/// Wire shape of a section, internally tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SectionRecord {
    Introduction(TextBody),
    Section(TextBody),
    Disclaimer(TextBody),
    Footnote(TextBody),
    Image(ImageBody),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TextBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ImageBody {
    #[serde(default)]
    images: Vec<ImageEntry>,
}

impl From<SectionRecord> for Section {
    fn from(value: SectionRecord) -> Self {
        let (kind, body) = match value {
            SectionRecord::Image(body) => return Section::image(body.images),
            SectionRecord::Introduction(body) => (SectionKind::Introduction, body),
            SectionRecord::Section(body) => (SectionKind::Section, body),
            SectionRecord::Disclaimer(body) => (SectionKind::Disclaimer, body),
            SectionRecord::Footnote(body) => (SectionKind::Footnote, body),
        };
        Section::text(kind, body.title, body.content)
    }
}

impl From<Section> for SectionRecord {
    fn from(value: Section) -> Self {
        let text = || TextBody {
            title: value.title.clone(),
            content: value.content.clone(),
        };
        match value.kind {
            SectionKind::Introduction => Self::Introduction(text()),
            SectionKind::Section => Self::Section(text()),
            SectionKind::Disclaimer => Self::Disclaimer(text()),
            SectionKind::Footnote => Self::Footnote(text()),
            SectionKind::Image => Self::Image(ImageBody {
                images: value.images.clone(),
            }),
        }
    }
}
