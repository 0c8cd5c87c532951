//! Record field validation.
//!
//! # Responsibility
//! - Turn raw form strings into a trimmed `RecordDraft` or the first failing
//!   rule.
//! - Publish the user-facing message table for every failure kind.
//!
//! # Invariants
//! - Rules run in a fixed order and stop at the first failure.
//! - `validate_fields` is pure; the uniqueness rule needs the store and runs
//!   in `RecordService::validate`.

use crate::model::record::{RecordDraft, RecordField, RecordInput};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required contact number length.
pub const CONTACT_LENGTH: usize = 11;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\..+$").expect("valid email regex"));

/// Reason a record input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// First field (in form order) that is empty after trimming.
    MissingField(RecordField),
    InvalidAge,
    InvalidContact,
    InvalidContactLength,
    InvalidEmail,
    InvalidEmailFormat,
    /// Another record already uses the name or the email.
    DuplicateRecord,
}

impl ValidationError {
    /// Every failure kind, in rule order. `MissingField` is represented by
    /// its first field.
    pub const KINDS: [ValidationError; 7] = [
        ValidationError::MissingField(RecordField::Name),
        ValidationError::InvalidAge,
        ValidationError::InvalidContact,
        ValidationError::InvalidContactLength,
        ValidationError::InvalidEmail,
        ValidationError::InvalidEmailFormat,
        ValidationError::DuplicateRecord,
    ];

    /// Stable machine-readable code for UI shells.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidAge => "invalid_age",
            Self::InvalidContact => "invalid_contact",
            Self::InvalidContactLength => "invalid_contact_length",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::DuplicateRecord => "duplicate_record",
        }
    }

    /// User-facing message for this failure kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "Please fill all fields",
            Self::InvalidAge => "Age must be a positive number",
            Self::InvalidContact => "Contact must contain only numbers (no letters)",
            Self::InvalidContactLength => "Contact number must be exactly 11 digits",
            Self::InvalidEmail => "Invalid Email: Must contain '@'",
            Self::InvalidEmailFormat => "Invalid Email format (e.g. user@example.com)",
            Self::DuplicateRecord => "A record with this Name or Email already exists.",
        }
    }

    /// Message shown by the edit form; differs from `message` only where the
    /// edit flow has its own copy.
    pub fn update_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "Required fields empty.",
            Self::DuplicateRecord => "Another record with this Name or Email already exists.",
            other => other.message(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ValidationError {}

/// Returns `(code, message)` for every failure kind, in rule order.
pub fn validation_messages() -> Vec<(&'static str, &'static str)> {
    ValidationError::KINDS
        .iter()
        .map(|kind| (kind.code(), kind.message()))
        .collect()
}

/// Applies the format rules (everything except uniqueness) to raw input.
///
/// Returned draft values are trimmed.
pub fn validate_fields(input: &RecordInput) -> Result<RecordDraft, ValidationError> {
    for field in RecordField::ALL {
        if input.get(field).trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    let age = parse_age(input.age.trim()).ok_or(ValidationError::InvalidAge)?;

    let contact = input.contact.trim();
    if !is_ascii_digits(contact) {
        return Err(ValidationError::InvalidContact);
    }
    if contact.chars().count() != CONTACT_LENGTH {
        return Err(ValidationError::InvalidContactLength);
    }

    let email = input.email.trim();
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(RecordDraft {
        name: input.name.trim().to_string(),
        age,
        address: input.address.trim().to_string(),
        contact: contact.to_string(),
        email: email.to_string(),
    })
}

/// Keystroke filter for the contact field: accepts the empty string or up to
/// 11 ASCII digits.
pub fn accepts_contact_keystroke(candidate: &str) -> bool {
    candidate.is_empty() || (candidate.len() <= CONTACT_LENGTH && is_ascii_digits(candidate))
}

fn parse_age(value: &str) -> Option<u32> {
    if !is_ascii_digits(value) {
        return None;
    }
    value.parse::<u32>().ok().filter(|age| *age > 0)
}

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{
        accepts_contact_keystroke, parse_age, validation_messages, ValidationError, EMAIL_RE,
    };

    #[test]
    fn parse_age_rejects_signs_and_overflow() {
        assert_eq!(parse_age("30"), Some(30));
        assert_eq!(parse_age("+30"), None);
        assert_eq!(parse_age("0"), None);
        assert_eq!(parse_age("4294967296"), None);
    }

    #[test]
    fn email_pattern_matches_basic_shape() {
        assert!(EMAIL_RE.is_match("john@example.com"));
        assert!(EMAIL_RE.is_match("a.b@c.d.e"));
        assert!(!EMAIL_RE.is_match("john@example"));
        assert!(!EMAIL_RE.is_match("@example.com"));
        assert!(!EMAIL_RE.is_match("john@.com"));
        assert!(!EMAIL_RE.is_match("john@example."));
    }

    #[test]
    fn contact_keystroke_filter_caps_length_and_digits() {
        assert!(accepts_contact_keystroke(""));
        assert!(accepts_contact_keystroke("0917"));
        assert!(accepts_contact_keystroke("09171234567"));
        assert!(!accepts_contact_keystroke("091712345678"));
        assert!(!accepts_contact_keystroke("0917-123"));
    }

    #[test]
    fn update_copy_differs_only_for_missing_and_duplicate() {
        for kind in ValidationError::KINDS {
            match kind {
                ValidationError::MissingField(_) => {
                    assert_eq!(kind.update_message(), "Required fields empty.")
                }
                ValidationError::DuplicateRecord => assert_eq!(
                    kind.update_message(),
                    "Another record with this Name or Email already exists."
                ),
                other => assert_eq!(other.update_message(), other.message()),
            }
        }
    }

    #[test]
    fn message_table_has_unique_codes() {
        let messages = validation_messages();
        assert_eq!(messages.len(), 7);
        let mut codes = messages.iter().map(|(code, _)| *code).collect::<Vec<_>>();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 7);
    }
}
