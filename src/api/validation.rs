//! Pre-flight checks run before any provider call.

use super::errors::ApiError;

/// Longest accepted concept, in characters.
pub const MAX_CONCEPT_CHARS: usize = 2000;

/// Longest accepted prompt, in characters.
pub const MAX_PROMPT_CHARS: usize = 5000;

/// Check that a required text field is present, non-empty and within
/// `limit` characters.
///
/// # Errors
///
/// Returns an `InvalidInput` error carrying `missing` or `too_long`.
pub fn require_text<'a>(
    value: Option<&'a str>,
    limit: usize,
    missing: &str,
    too_long: &str,
) -> Result<&'a str, ApiError> {
    let text = value.filter(|t| !t.is_empty()).ok_or_else(|| ApiError::invalid_input(missing))?;
    if text.chars().count() > limit {
        return Err(ApiError::invalid_input(too_long));
    }
    Ok(text)
}

/// Treat an empty optional image the same as an absent one.
#[must_use]
pub fn optional_image(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
