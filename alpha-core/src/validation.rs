use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AlphaError, Result};

/// Longest food item name accepted on a meal.
pub const MAX_FOOD_ITEM_LEN: usize = 200;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

/// Trim and lower-case an email, rejecting anything not shaped like `local@domain.tld`.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    if email_regex().is_match(&email) {
        Ok(email)
    } else {
        Err(AlphaError::Validation(format!("Invalid email address: {}", raw.trim())))
    }
}

pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AlphaError::Validation(format!("{} must not be empty", field)))
    } else {
        Ok(trimmed)
    }
}
