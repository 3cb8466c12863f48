//! Profile domain model.
//!
//! # Responsibility
//! - Define the canonical user profile record and its create/update inputs.
//! - Provide lifecycle helpers for soft-delete semantics.
//! - Produce the public and listing projections.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, and never changes after.
//! - `active` is the source of truth for soft-delete state.
//! - `secret` is excluded from every projection and redacted in `Debug`.

use super::validation::{validate_fields, ValidationErrors};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Debug, Formatter};

/// Store-assigned identifier of a persisted profile.
pub type ProfileId = i64;

/// Age as supplied by a caller.
///
/// Untyped input may not be an integer at all; such values are kept as
/// `Unparsed` so validation can report them alongside every other rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Age {
    Years(i64),
    Unparsed(String),
}

impl Age {
    /// Parses textual input, keeping the raw text when it is not an integer.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(years) => Self::Years(years),
            Err(_) => Self::Unparsed(raw.to_string()),
        }
    }

    pub fn years(&self) -> Option<i64> {
        match self {
            Self::Years(years) => Some(*years),
            Self::Unparsed(_) => None,
        }
    }

    fn from_float(value: f64) -> Self {
        let integral = value.is_finite()
            && value.fract() == 0.0
            && value >= i64::MIN as f64
            && value < i64::MAX as f64;
        if integral {
            Self::Years(value as i64)
        } else {
            Self::Unparsed(value.to_string())
        }
    }
}

impl From<i64> for Age {
    fn from(value: i64) -> Self {
        Self::Years(value)
    }
}

impl<'de> Deserialize<'de> for Age {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAge {
            Integer(i64),
            Float(f64),
            Text(String),
            Bool(bool),
        }

        Ok(match RawAge::deserialize(deserializer)? {
            RawAge::Integer(years) => Self::Years(years),
            RawAge::Float(value) => Self::from_float(value),
            RawAge::Text(text) => Self::parse(&text),
            RawAge::Bool(flag) => Self::Unparsed(flag.to_string()),
        })
    }
}

/// Credential-like value that must never be echoed back.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Input for creating a profile.
///
/// Missing `name`/`email` are treated as empty and fail the "required" rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub secret: Option<Secret>,
    #[serde(default)]
    pub age: Option<Age>,
}

impl NewProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn with_age(mut self, age: impl Into<Age>) -> Self {
        self.age = Some(age.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(Secret::new(secret));
        self
    }
}

/// Partial update input.
///
/// Only `name`, `email` and `age` are settable. Absent fields keep their
/// current value; `age: null` clears the age. Any other field in the input
/// (`id`, `secret`, `active`, timestamps) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub age: Option<Option<Age>>,
}

impl ProfilePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn age(mut self, age: Option<Age>) -> Self {
        self.age = Some(age);
        self
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Canonical profile record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: Option<ProfileId>,
    pub name: String,
    pub email: String,
    pub secret: Option<Secret>,
    pub age: Option<Age>,
    /// Cleared on delete; the row itself is kept.
    pub active: bool,
    /// ISO-8601 UTC.
    pub created_at: String,
    /// ISO-8601 UTC, refreshed on every mutation.
    pub updated_at: String,
}

impl Profile {
    /// Builds an unpersisted candidate from create input.
    ///
    /// # Invariants
    /// - `id` is `None`, `active` is `true`.
    /// - Both timestamps are set to the current time.
    /// - Name and email are trimmed; nothing is validated yet.
    pub fn new(input: NewProfile) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            name: input.name.unwrap_or_default().trim().to_string(),
            email: input.email.unwrap_or_default().trim().to_string(),
            secret: input.secret,
            age: input.age,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Rebuilds a persisted profile from stored columns.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_stored(
        id: ProfileId,
        name: String,
        email: String,
        secret: Option<String>,
        age: Option<i64>,
        active: bool,
        created_at: String,
        updated_at: String,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            email,
            secret: secret.map(Secret::new),
            age: age.map(Age::Years),
            active,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Option<ProfileId> {
        self.id
    }

    /// Records the store-assigned identifier. A second assignment is ignored.
    pub(crate) fn assign_id(&mut self, id: ProfileId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    /// Runs all field rules, accumulating every failure.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(&self.name, &self.email, self.age.as_ref())
    }

    /// Merges the fields present in `patch`.
    ///
    /// Returns whether the email value changed. Timestamps are left alone;
    /// callers `touch` once the merged record is accepted.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) -> bool {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(age) = &patch.age {
            self.age = age.clone();
        }
        match &patch.email {
            Some(email) if email.trim() != self.email => {
                self.email = email.trim().to_string();
                true
            }
            _ => false,
        }
    }

    /// Case-insensitive email comparison used for uniqueness.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_timestamp();
    }

    /// Marks this profile as softly deleted.
    pub fn soft_delete(&mut self) {
        self.active = false;
        self.touch();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Everything except the secret.
    pub fn to_public_view(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age.as_ref().and_then(Age::years),
            active: self.active,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// Name, email and age only.
    pub fn to_list_view(&self) -> ProfileListItem {
        ProfileListItem {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age.as_ref().and_then(Age::years),
        }
    }
}

/// Public projection of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Option<ProfileId>,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Listing projection of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileListItem {
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
}

/// Current time as ISO-8601 UTC with microsecond precision.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::{Age, NewProfile, Profile, ProfilePatch};

    #[test]
    fn age_from_float_keeps_only_integral_values() {
        assert_eq!(Age::from_float(30.0), Age::Years(30));
        assert!(matches!(Age::from_float(30.5), Age::Unparsed(_)));
        assert!(matches!(Age::from_float(f64::NAN), Age::Unparsed(_)));
    }

    #[test]
    fn apply_patch_reports_email_change_only_when_value_differs() {
        let mut profile = Profile::new(NewProfile::new("Ana", "ana@test.com"));

        assert!(!profile.apply_patch(&ProfilePatch::default().email(" ana@test.com ")));
        assert!(profile.apply_patch(&ProfilePatch::default().email("ANA@test.com")));
        assert_eq!(profile.email, "ANA@test.com");
    }

    #[test]
    fn assign_id_is_write_once() {
        let mut profile = Profile::new(NewProfile::new("Ana", "ana@test.com"));
        profile.assign_id(7);
        profile.assign_id(8);
        assert_eq!(profile.id(), Some(7));
    }
}
