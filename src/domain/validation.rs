use crate::domain::errors::{DomainError, DomainResult};

/// Trims `value` and rejects blank input with a field-scoped error.
pub fn require_str(field: &'static str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Required { field });
    }

    Ok(trimmed.to_string())
}
