use crate::domain::errors::{DomainError, DomainResult};

/// Normalize a provider phone number (`5491100000000`) to the stored
/// `+5491100000000` form.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    format!("+{}", digits)
}

/// Validate a phone number typed by an agent. The value is kept as typed
/// (trimmed); the store enforces uniqueness.
pub fn validate_phone_input(phone: &str) -> DomainResult<String> {
    let trimmed = phone.trim();

    if trimmed.is_empty() {
        return Err(DomainError::Validation("Phone number is required".to_string()));
    }

    Ok(trimmed.to_string())
}
