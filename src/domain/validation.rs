//! Format checks applied to account data before it reaches storage.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{MAX_PASSWORD_LENGTH, MAX_PHONE_DIGITS, MIN_PASSWORD_LENGTH, MIN_PHONE_DIGITS};
use crate::errors::{AppError, AppResult};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

// ASCII letters, with single apostrophes or hyphens between letters ("O'Neil", "Jean-Luc").
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:['\-][A-Za-z]+)*$").expect("valid name regex"));

pub fn validate_email(email: &str) -> AppResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::validation("Invalid email address"))
    }
}

pub fn validate_name(field: &str, value: &str) -> AppResult<()> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{} may only contain letters, apostrophes and hyphens",
            field
        )))
    }
}

pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(AppError::validation(format!(
            "Password must be between {} and {} characters",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )));
    }
    if password
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(AppError::validation(
            "Password must not contain whitespace or control characters",
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> AppResult<()> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = digits.chars().all(|c| c.is_ascii_digit())
        && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len());
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Phone number must have {} to {} digits",
            MIN_PHONE_DIGITS, MAX_PHONE_DIGITS
        )))
    }
}

/// Trimmed value, or a validation error naming `field` when blank.
pub fn require(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::validation(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}
