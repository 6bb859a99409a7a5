//! Reusable field validators
//!
//! Custom rules referenced from `#[validate(custom(function = ...))]`

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validator: value is not empty after trimming
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule("not_blank", "must not be blank"))
    } else {
        Ok(())
    }
}

/// Validator: phone number, optional leading `+`, 7 to 15 digits
///
/// Spaces and dashes between digits are allowed.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap());

    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if regex.is_match(value.trim()) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(rule("phone", "must be a valid phone number"))
    }
}

/// Validator: Indian PAN, e.g. `ABCDE1234F` (case-insensitive)
pub fn pan_number(value: &str) -> Result<(), ValidationError> {
    static PAN_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PAN_REGEX.get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap());

    if regex.is_match(&value.trim().to_ascii_uppercase()) {
        Ok(())
    } else {
        Err(rule("pan_number", "must be a valid PAN (e.g. ABCDE1234F)"))
    }
}

/// Validator: lower-case slug made of alphanumerics and single dashes
pub fn slug(value: &str) -> Result<(), ValidationError> {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

    if regex.is_match(value) {
        Ok(())
    } else {
        Err(rule("slug", "must contain only a-z, 0-9 and single dashes"))
    }
}

/// Validator: absolute http(s) URL or a site-relative path
pub fn link(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let ok = value.starts_with('/')
        || ["http://", "https://"]
            .iter()
            .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme));
    if ok && !value.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(rule("link", "must be an http(s) URL or a path starting with '/'"))
    }
}

/// Validator: setting keys are short dotted identifiers (`contact.email`)
pub fn setting_key(value: &str) -> Result<(), ValidationError> {
    let ok = !value.is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok {
        Ok(())
    } else {
        Err(rule("setting_key", "must be 1-64 chars of a-z, 0-9, '_', '-' or '.'"))
    }
}
