//! Identifier and date validation.
//!
//! # Responsibility
//! - Provide pure checks used at the model boundary.
//!
//! # Invariants
//! - Validation never mutates input and never panics.
//! - Dates use the `YYYY-MM-DD` calendar format only.

use super::error::{ModelError, ModelResult};
use chrono::NaiveDate;

/// Persisted date format for translation metadata.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns whether `id` is a valid project id.
///
/// Valid ids are non-empty after trimming and contain only alphanumerics,
/// `-` or `_`. Whitespace anywhere makes the id invalid.
pub fn validate_project_id(id: &str) -> bool {
    if id.trim().is_empty() {
        return false;
    }
    id.chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Returns whether `value` parses as a `YYYY-MM-DD` date.
pub fn validate_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Formats a date in the persisted `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Normalizes a language code: trimmed and lowercased.
///
/// # Errors
/// - `InvalidId` when the code is empty or contains characters other than
///   ASCII alphanumerics, `-` or `_`.
pub fn normalize_language_code(code: &str) -> ModelResult<String> {
    let normalized = code.trim().to_ascii_lowercase();
    let valid = !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ModelError::InvalidId(code.to_string()));
    }
    Ok(normalized)
}
