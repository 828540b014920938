//! Field-level input checks shared by the record crates.
//!
//! Lengths are counted in characters, not bytes.

use crate::error::{DomainError, DomainResult};

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    max_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Length check for an optional field. The value is kept as given.
pub fn optional_text(field: &str, value: Option<String>, max: usize) -> DomainResult<Option<String>> {
    if let Some(v) = value.as_deref() {
        max_len(field, v, max)?;
    }
    Ok(value)
}

pub fn max_len(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Loose email shape check: must contain `@` and `.`. Blank values pass through
/// untouched; anything else is returned trimmed.
pub fn optional_email(field: &str, value: Option<String>, max: usize) -> DomainResult<Option<String>> {
    let Some(v) = value else {
        return Ok(None);
    };
    if v.trim().is_empty() {
        return Ok(Some(v));
    }
    max_len(field, &v, max)?;
    if !v.contains('@') || !v.contains('.') {
        return Err(DomainError::validation(format!("{field}: invalid email format")));
    }
    Ok(Some(v.trim().to_string()))
}
