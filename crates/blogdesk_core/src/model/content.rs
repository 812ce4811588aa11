//! Section content formatting helpers.
//!
//! # Responsibility
//! - Convert raw editor text to stored paragraph markup and back.
//! - Apply toolbar inline styles to a selected range.
//! - Split and join the comma-separated tag field.
//!
//! # Invariants
//! - `format_content(unformat_content(x)) == x` for every `x` produced by
//!   `format_content`.
//! - Empty or blank input formats to an empty string.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static PARAGRAPH_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</p>\s*<p>").expect("valid paragraph boundary regex"));
static PARAGRAPH_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?p>").expect("valid paragraph tag regex"));
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));
static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const LINE_BREAK: &str = "<br>";

/// Formats raw editor text into paragraph markup.
///
/// Blank lines separate paragraphs, lines inside a paragraph are trimmed and
/// joined with `<br>`, each paragraph is wrapped in `<p>..</p>` unless it
/// already starts with `<p>`. Paragraphs are joined with a newline.
pub fn format_content(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");
    let mut paragraphs = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut lines, &mut paragraphs);
        } else {
            lines.push(trimmed);
        }
    }
    flush_paragraph(&mut lines, &mut paragraphs);

    paragraphs.join("\n")
}

fn flush_paragraph(lines: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join(LINE_BREAK);
    lines.clear();
    if joined.starts_with("<p>") {
        paragraphs.push(joined);
    } else {
        paragraphs.push(format!("<p>{joined}</p>"));
    }
}

/// Turns stored paragraph markup back into raw editor text.
///
/// Paragraph boundaries become blank lines and `<br>` variants become
/// newlines. Other markup (bold, links, list items) is left untouched.
pub fn unformat_content(stored: &str) -> String {
    let normalized = stored.replace("\r\n", "\n");
    let with_blank_lines = PARAGRAPH_BOUNDARY_RE.replace_all(&normalized, "\n\n");
    let without_paragraphs = PARAGRAPH_TAG_RE.replace_all(&with_blank_lines, "");
    let with_newlines = LINE_BREAK_RE.replace_all(&without_paragraphs, "\n");
    with_newlines.trim().to_string()
}

/// Removes every markup tag, keeping text content.
pub fn strip_tags(markup: &str) -> String {
    ANY_TAG_RE.replace_all(markup, "").into_owned()
}

/// Inline style offered by the section formatting toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Code,
    ListItem,
    /// Anchor opening in a new tab.
    Link { href: String },
}

impl InlineStyle {
    fn tags(&self) -> Option<(String, &'static str)> {
        let pair = match self {
            Self::Bold => ("<b>".to_string(), "</b>"),
            Self::Italic => ("<i>".to_string(), "</i>"),
            Self::Underline => ("<u>".to_string(), "</u>"),
            Self::Code => ("<code>".to_string(), "</code>"),
            Self::ListItem => ("<li>".to_string(), "</li>"),
            Self::Link { href } => {
                let href = href.trim();
                if href.is_empty() {
                    return None;
                }
                (
                    format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">"#),
                    "</a>",
                )
            }
        };
        Some(pair)
    }
}

/// Wraps `selection` (byte range) of `text` with the style's tags.
///
/// Returns `None`, leaving the caller's text as is, when the selection is
/// empty, out of bounds, not on char boundaries, or a link has no URL.
pub fn apply_inline_style(text: &str, selection: Range<usize>, style: &InlineStyle) -> Option<String> {
    if selection.start >= selection.end
        || selection.end > text.len()
        || !text.is_char_boundary(selection.start)
        || !text.is_char_boundary(selection.end)
    {
        return None;
    }
    let (open, close) = style.tags()?;

    let mut styled = String::with_capacity(text.len() + open.len() + close.len());
    styled.push_str(&text[..selection.start]);
    styled.push_str(&open);
    styled.push_str(&text[selection.clone()]);
    styled.push_str(close);
    styled.push_str(&text[selection.end..]);
    Some(styled)
}

/// Splits the comma-separated tag field, trimming and dropping blanks.
pub fn split_tags(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Joins tags back into the single editor field.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::{
        apply_inline_style, format_content, join_tags, split_tags, strip_tags, unformat_content,
        InlineStyle,
    };

    #[test]
    fn format_wraps_each_paragraph() {
        assert_eq!(format_content("Hello\n\nWorld"), "<p>Hello</p>\n<p>World</p>");
    }

    #[test]
    fn format_joins_lines_with_break_and_trims() {
        assert_eq!(
            format_content("  one \n two\n\n\n three\r\n"),
            "<p>one<br>two</p>\n<p>three</p>"
        );
    }

    #[test]
    fn format_empty_input_is_empty() {
        assert_eq!(format_content(""), "");
        assert_eq!(format_content(" \n\n \t"), "");
    }

    #[test]
    fn format_keeps_existing_paragraph_markup() {
        assert_eq!(format_content("<p>done</p>"), "<p>done</p>");
    }

    #[test]
    fn unformat_restores_editable_text() {
        assert_eq!(
            unformat_content("<p>one<br>two</p>\n<p>three</p>"),
            "one\ntwo\n\nthree"
        );
        assert_eq!(unformat_content("<P>a<br/>b<br />c</P>"), "a\nb\nc");
    }

    #[test]
    fn format_unformat_is_stable() {
        let stored = format_content("Intro line\nsecond\n\n<b>bold</b> text");
        assert_eq!(format_content(&unformat_content(&stored)), stored);
    }

    #[test]
    fn inline_style_wraps_selection() {
        let styled = apply_inline_style("make this bold", 5..9, &InlineStyle::Bold).unwrap();
        assert_eq!(styled, "make <b>this</b> bold");
    }

    #[test]
    fn link_style_requires_url() {
        let link = InlineStyle::Link {
            href: "https://example.com".into(),
        };
        assert_eq!(
            apply_inline_style("docs", 0..4, &link).unwrap(),
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">docs</a>"#
        );
        let empty = InlineStyle::Link { href: "  ".into() };
        assert_eq!(apply_inline_style("docs", 0..4, &empty), None);
    }

    #[test]
    fn inline_style_rejects_bad_ranges() {
        assert_eq!(apply_inline_style("abc", 1..1, &InlineStyle::Code), None);
        assert_eq!(apply_inline_style("abc", 0..9, &InlineStyle::Code), None);
        assert_eq!(apply_inline_style("héllo", 1..2, &InlineStyle::Italic), None);
    }

    #[test]
    fn tags_split_and_join() {
        let tags = split_tags(" rust, ,blog ,  notes,");
        assert_eq!(tags, vec!["rust", "blog", "notes"]);
        assert_eq!(join_tags(&tags), "rust, blog, notes");
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<p>Hi <b>there</b></p>"), "Hi there");
    }
}
