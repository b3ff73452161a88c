//! Identifier validation
//!
//! Turns a free-form "name or id" into the canonical lookup key. This is the
//! only place identifiers are validated; everything downstream trusts the
//! returned key.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::LookupError;

static NUMERIC_PATTERN: OnceLock<Regex> = OnceLock::new();
static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn numeric_pattern() -> &'static Regex {
    NUMERIC_PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]+$").expect("Invalid numeric id regex"))
}

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| Regex::new(r"^[a-z-]+$").expect("Invalid name regex"))
}

/// Normalize an identifier that may be absent.
///
/// - absent or blank input is rejected
/// - all-digit input is returned trimmed but otherwise unchanged
/// - anything else is lowercased and must then consist of `a-z` and `-`
pub fn normalize_optional(input: Option<&str>) -> Result<String, LookupError> {
    let input = input.ok_or_else(|| {
        LookupError::InvalidIdentifier("Pokemon name or id must not be null".to_string())
    })?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LookupError::InvalidIdentifier(
            "Pokemon name or id must not be empty".to_string(),
        ));
    }

    if numeric_pattern().is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    let lowered = trimmed.to_lowercase();
    if name_pattern().is_match(&lowered) {
        return Ok(lowered);
    }

    Err(LookupError::InvalidIdentifier(
        "Invalid pokemon identifier. Use a valid name or numeric id".to_string(),
    ))
}

/// Normalize a caller-supplied identifier.
pub fn normalize(input: &str) -> Result<String, LookupError> {
    normalize_optional(Some(input))
}

/// Validate listing pagination parameters.
pub fn validate_page(offset: i64, limit: i64) -> Result<(), LookupError> {
    if offset < 0 {
        return Err(LookupError::InvalidIdentifier(format!(
            "offset must be >= 0, got {}",
            offset
        )));
    }
    if limit <= 0 {
        return Err(LookupError::InvalidIdentifier(format!(
            "limit must be > 0, got {}",
            limit
        )));
    }
    Ok(())
}
