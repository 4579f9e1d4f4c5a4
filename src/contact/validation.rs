//! Field validation for contact submissions.
//!
//! Patterns are compiled once per process and shared read-only by every
//! request. Failures are reported through `validator`'s error type so the
//! web layer can log the offending field; clients only ever see a generic
//! message.

use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use super::IncomingMessage;

/// Email address pattern: dotted or quoted local part, and either a dotted
/// domain name or a bracketed IPv4 literal.
pub const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

/// Allow-list for free text: letters, digits, spaces and `$!@&#%?'":,^_.-`.
pub const TEXT_PATTERN: &str = r#"^[$!@&#%?'":,^a-z A-Z0-9_.-]*$"#;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern must compile"));

static TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TEXT_PATTERN).expect("text pattern must compile"));

/// Whether `value` looks like a deliverable email address.
pub fn is_valid_email(value: &str) -> bool {
    !value.chars().any(char::is_control) && EMAIL_RE.is_match(value)
}

/// Whether `value` only contains allowed free-text characters.
pub fn is_valid_text(value: &str) -> bool {
    TEXT_RE.is_match(value)
}

fn invalid(code: &'static str) -> ValidationError {
    ValidationError::new(code).with_message("Request body contains an inappropriate value.".into())
}

impl IncomingMessage {
    /// First field failing validation, checked in the order email, name,
    /// title, body.
    fn first_invalid_field(&self) -> Option<(&'static str, ValidationError)> {
        if !is_valid_email(&self.email) {
            return Some(("Email", invalid("email")));
        }
        [("Name", &self.name), ("Title", &self.title), ("Body", &self.body)]
            .into_iter()
            .find(|(_, value)| !is_valid_text(value))
            .map(|(field, _)| (field, invalid("text")))
    }
}

impl Validate for IncomingMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self.first_invalid_field() {
            None => Ok(()),
            Some((field, error)) => {
                let mut errors = ValidationErrors::new();
                errors.add(field, error);
                Err(errors)
            }
        }
    }
}
