//! Free-text cleanup shared by transactions, templates and categories.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ValidationError;

static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\p{L}\p{N}\s.,\-'_!"&]"#).expect("valid character class"));
static REPEATED_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Replaces disallowed characters with a space, collapses whitespace runs and trims.
///
/// Letters and numbers from any script are kept, as is the punctuation set
/// `. , - ' _ ! " &`.
pub fn sanitize(text: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(text, " ");
    let collapsed = REPEATED_WHITESPACE.replace_all(&replaced, " ");
    collapsed.trim().to_string()
}

/// Sanitizes an optional field, mapping blank results to `None`.
pub fn sanitize_optional(text: Option<&str>) -> Option<String> {
    let cleaned = sanitize(text?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn validate_category(name: &str) -> Result<String, ValidationError> {
    let sanitized = sanitize(name);
    if sanitized.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(sanitized)
}

/// Validates a full category list, keeping the first occurrence of any duplicate.
pub fn validate_categories(names: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut cleaned: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let category = validate_category(name)?;
        if !cleaned.contains(&category) {
            cleaned.push(category);
        }
    }
    Ok(cleaned)
}
