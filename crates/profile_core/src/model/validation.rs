//! Field-level validation rules for profiles.
//!
//! Rules are independent and never short-circuit each other, so a caller
//! sees every problem with an input at once.

use super::profile::Age;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum name length, counted in characters after trimming.
pub const MIN_NAME_CHARS: usize = 2;
/// Inclusive bounds for `age`.
pub const AGE_RANGE: std::ops::RangeInclusive<i64> = 0..=150;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// One failed validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NameRequired,
    NameTooShort,
    EmailRequired,
    EmailInvalid,
    /// Covers out-of-range integers and anything that is not an integer.
    AgeOutOfRange,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            Self::NameRequired => "name is required",
            Self::NameTooShort => "name must be at least 2 characters",
            Self::EmailRequired => "email is required",
            Self::EmailInvalid => "email must be valid",
            Self::AgeOutOfRange => "age must be a number between 0 and 150",
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Ordered, non-empty list of failed rules for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn contains(&self, error: FieldError) -> bool {
        self.errors.contains(&error)
    }

    /// Human-readable messages in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|error| error.message().to_string())
            .collect()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl Error for ValidationErrors {}

/// Runs every rule over the given fields.
///
/// Returns `Ok(())` when all rules pass, otherwise every failing rule in
/// check order: name, email, age.
pub fn validate_fields(name: &str, email: &str, age: Option<&Age>) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let name = name.trim();
    if name.is_empty() {
        errors.push(FieldError::NameRequired);
    } else if name.chars().count() < MIN_NAME_CHARS {
        errors.push(FieldError::NameTooShort);
    }

    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError::EmailRequired);
    } else if !is_valid_email(email) {
        errors.push(FieldError::EmailInvalid);
    }

    if let Some(age) = age {
        let in_range = age.years().is_some_and(|years| AGE_RANGE.contains(&years));
        if !in_range {
            errors.push(FieldError::AgeOutOfRange);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Simple `local@domain.tld` shape check with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, validate_fields, FieldError};
    use crate::model::profile::Age;

    #[test]
    fn accepts_minimal_valid_fields() {
        assert!(validate_fields("Jo", "jo@test.com", None).is_ok());
    }

    #[test]
    fn reports_every_failure_in_rule_order() {
        let err = validate_fields("  ", "", Some(&Age::Years(-1))).unwrap_err();
        assert_eq!(
            err.errors(),
            &[
                FieldError::NameRequired,
                FieldError::EmailRequired,
                FieldError::AgeOutOfRange
            ]
        );
    }

    #[test]
    fn length_rule_only_applies_to_non_empty_names() {
        let empty = validate_fields("", "a@b.co", None).unwrap_err();
        assert!(!empty.contains(FieldError::NameTooShort));

        let short = validate_fields(" J ", "a@b.co", None).unwrap_err();
        assert_eq!(short.errors(), &[FieldError::NameTooShort]);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ana@test.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ana@test"));
        assert!(!is_valid_email("ana test@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ana@@x.com"));
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert!(validate_fields("Ana", "a@b.co", Some(&Age::Years(0))).is_ok());
        assert!(validate_fields("Ana", "a@b.co", Some(&Age::Years(150))).is_ok());
        assert!(validate_fields("Ana", "a@b.co", Some(&Age::Years(151))).is_err());
    }

    #[test]
    fn unparsed_age_uses_the_range_message() {
        let err = validate_fields("Ana", "a@b.co", Some(&Age::parse("abc"))).unwrap_err();
        assert_eq!(err.messages(), vec!["age must be a number between 0 and 150"]);
    }
}
