//! Static HTML preview of translations.
//!
//! # Invariants
//! - Rendering is pure: the same input yields byte-identical output.
//! - Section `content` is emitted raw (already markup); callers own any
//!   sanitization. Titles, metadata and image attributes are escaped.

use crate::model::project::{LanguageLabel, Project};
use crate::model::section::Section;
use crate::model::translation::Translation;
use std::fmt::Write;

const PREVIEW_STYLE: &str = "body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }\n\
img { max-width: 100%; height: auto; }\n\
.metadata { color: #666; margin-bottom: 20px; }\n\
.section { margin-bottom: 30px; }\n\
.language { border-bottom: 1px solid #ddd; margin-top: 40px; }";

/// Renders one translation as a standalone HTML document.
pub fn render_html(translation: &Translation) -> String {
    let mut html = String::new();
    open_document(&mut html);
    render_translation_body(&mut html, translation);
    close_document(&mut html);
    html
}

/// Renders every translation of a project, sorted by language code.
pub fn render_project_html(project: &Project) -> String {
    let mut html = String::new();
    open_document(&mut html);
    for (code, translation) in &project.translations {
        let label = LanguageLabel::for_code(code);
        let _ = writeln!(
            html,
            "<h1 class=\"language\">Language: {}</h1>",
            escape_html(&label.to_string())
        );
        render_translation_body(&mut html, translation);
    }
    close_document(&mut html);
    html
}

/// Escapes text for element content and quoted attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn open_document(html: &mut String) {
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
    html.push_str(PREVIEW_STYLE);
    html.push_str("\n</style>\n</head>\n<body>\n");
}

fn close_document(html: &mut String) {
    html.push_str("</body>\n</html>\n");
}

fn render_translation_body(html: &mut String, translation: &Translation) {
    let metadata = &translation.metadata;
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&translation.title));
    html.push_str("<div class=\"metadata\">\n");
    let _ = writeln!(html, "<p>Date: {}</p>", escape_html(&metadata.date));
    let _ = writeln!(html, "<p>Author: {}</p>", escape_html(&metadata.author));
    let _ = writeln!(html, "<p>Category: {}</p>", escape_html(&metadata.category));
    let _ = writeln!(
        html,
        "<p>Tags: {}</p>",
        escape_html(&metadata.tags.join(", "))
    );
    html.push_str("</div>\n");

    for section in &translation.sections {
        render_section(html, section);
    }
}

fn render_section(html: &mut String, section: &Section) {
    html.push_str("<div class=\"section\">");
    if section.is_image() {
        for image in &section.images {
            let _ = write!(
                html,
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(&image.src),
                escape_html(&image.alt_text)
            );
        }
    } else {
        if let Some(title) = section.visible_title() {
            let _ = write!(html, "<h2>{}</h2>", escape_html(title));
        }
        html.push_str(&section.content);
    }
    html.push_str("</div>\n");
}
