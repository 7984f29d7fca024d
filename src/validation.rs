use anyhow::{Context, Result};
use regex::Regex;
use validator::ValidateEmail;

/// Input validation for the submission endpoint.
///
/// The email check requires the full local@domain.tld shape: the HTML5
/// check from the validator crate alone would accept addresses without a
/// top-level domain (e.g. "a@b"), which the submission flow rejects.
#[derive(Debug, Clone)]
pub struct InputValidator {
    email_regex: Regex,
}

impl InputValidator {
    pub fn new() -> Result<Self> {
        let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .context("Failed to compile email regex")?;

        Ok(Self { email_regex })
    }

    /// Validate email address shape
    pub fn is_valid_email(&self, email: &str) -> bool {
        email.validate_email() && self.email_regex.is_match(email)
    }
}
