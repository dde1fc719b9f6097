//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum accepted password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Trim and lower-case an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email should not be empty".to_string());
    }

    if email.len() > 254 {
        return Err("email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("email must be an email".to_string());
    }

    Ok(())
}

/// Validate a password chosen at registration
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("password should not be empty".to_string());
    }

    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at most {} characters long",
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate registration input, collecting every field message
pub fn validate_registration(email: &str, password: &str) -> Result<(), Vec<String>> {
    let errors: Vec<String> = [validate_email(email), validate_password(password)]
        .into_iter()
        .filter_map(Result::err)
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
