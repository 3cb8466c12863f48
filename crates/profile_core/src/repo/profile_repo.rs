//! Profile repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the create/list/get/update/soft-delete APIs over `profiles`.
//! - Enforce case-insensitive email uniqueness.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each operation holds the store lock for its whole duration.
//! - Read paths reject rows whose `active` column is not 0/1.

use crate::db::{DbError, ProfileStore};
use crate::model::profile::{Age, NewProfile, Profile, ProfileId, ProfilePatch, Secret};
use crate::model::validation::ValidationErrors;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message reported for an email uniqueness violation.
pub const EMAIL_CONFLICT_MESSAGE: &str = "email already registered";

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    secret,
    age,
    active,
    created_at,
    updated_at
FROM profiles";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for profile persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// One or more field rules failed; nothing was written.
    Validation(ValidationErrors),
    /// The email is already held by another profile; nothing was written.
    Conflict { email: String },
    /// No active profile has this id.
    NotFound(ProfileId),
    Db(DbError),
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn conflict(email: &str) -> Self {
        Self::Conflict {
            email: email.to_string(),
        }
    }

    /// Client-facing error list for this outcome.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors.messages(),
            other => vec![other.to_string()],
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { .. } => f.write_str(EMAIL_CONFLICT_MESSAGE),
            Self::NotFound(id) => write!(f, "profile not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted profile data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Conflict { .. } | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for profile records.
pub trait ProfileRepository {
    /// All active profiles, in id order.
    fn find_all(&self) -> RepoResult<Vec<Profile>>;
    /// Active profile with this id.
    fn find_by_id(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    /// Profile with this id regardless of `active`, for audit reads.
    fn find_by_id_including_inactive(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    /// Active profile with this email, compared case-insensitively.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>>;
    /// Whether any profile, active or not, holds this email.
    fn email_exists(&self, email: &str) -> RepoResult<bool>;
    /// Validates, checks uniqueness, then persists a new profile.
    fn create(&self, input: NewProfile) -> RepoResult<Profile>;
    /// Merges `patch` into the active profile `id` and persists it.
    fn update(&self, id: ProfileId, patch: &ProfilePatch) -> RepoResult<Profile>;
    /// Soft-deletes the active profile `id`. Returns `false` when absent.
    fn delete(&self, id: ProfileId) -> RepoResult<bool>;
    /// Number of active profiles.
    fn count(&self) -> RepoResult<usize>;
}

/// SQLite-backed profile repository.
#[derive(Clone)]
pub struct SqliteProfileRepository {
    store: ProfileStore,
}

impl SqliteProfileRepository {
    pub fn new(store: ProfileStore) -> Self {
        Self { store }
    }
}

impl ProfileRepository for SqliteProfileRepository {
    fn find_all(&self) -> RepoResult<Vec<Profile>> {
        let conn = self.store.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{PROFILE_SELECT_SQL} WHERE active = 1 ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }

        Ok(profiles)
    }

    fn find_by_id(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let conn = self.store.lock()?;
        select_active_by_id(&conn, id)
    }

    fn find_by_id_including_inactive(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let conn = self.store.lock()?;
        select_one(&conn, "WHERE id = ?1", [id])
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>> {
        let conn = self.store.lock()?;
        select_active_by_email(&conn, email)
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let conn = self.store.lock()?;
        email_taken(&conn, email)
    }

    fn create(&self, input: NewProfile) -> RepoResult<Profile> {
        let mut profile = Profile::new(input);
        profile.validate()?;

        let conn = self.store.lock()?;
        if email_taken(&conn, &profile.email)? {
            return Err(RepoError::conflict(&profile.email));
        }

        conn.execute(
            "INSERT INTO profiles (
                name,
                email,
                secret,
                age,
                active,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                profile.name.as_str(),
                profile.email.as_str(),
                profile.secret.as_ref().map(Secret::expose),
                profile.age.as_ref().and_then(Age::years),
                bool_to_int(profile.active),
                profile.created_at.as_str(),
                profile.updated_at.as_str(),
            ],
        )
        .map_err(|err| map_write_error(err, &profile.email))?;

        profile.assign_id(conn.last_insert_rowid());
        Ok(profile)
    }

    fn update(&self, id: ProfileId, patch: &ProfilePatch) -> RepoResult<Profile> {
        let conn = self.store.lock()?;
        let mut profile = select_active_by_id(&conn, id)?.ok_or(RepoError::NotFound(id))?;

        if profile.apply_patch(patch) {
            if let Some(holder) = select_active_by_email(&conn, &profile.email)? {
                if holder.id() != Some(id) {
                    return Err(RepoError::conflict(&profile.email));
                }
            }
        }
        profile.validate()?;
        profile.touch();

        let changed = conn
            .execute(
                "UPDATE profiles
                 SET
                    name = ?1,
                    email = ?2,
                    age = ?3,
                    updated_at = ?4
                 WHERE id = ?5 AND active = 1;",
                params![
                    profile.name.as_str(),
                    profile.email.as_str(),
                    profile.age.as_ref().and_then(Age::years),
                    profile.updated_at.as_str(),
                    id,
                ],
            )
            .map_err(|err| map_write_error(err, &profile.email))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(profile)
    }

    fn delete(&self, id: ProfileId) -> RepoResult<bool> {
        let conn = self.store.lock()?;
        let Some(mut profile) = select_active_by_id(&conn, id)? else {
            return Ok(false);
        };
        profile.soft_delete();

        let changed = conn.execute(
            "UPDATE profiles
             SET
                active = 0,
                updated_at = ?1
             WHERE id = ?2 AND active = 1;",
            params![profile.updated_at.as_str(), id],
        )?;

        Ok(changed > 0)
    }

    fn count(&self) -> RepoResult<usize> {
        let conn = self.store.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM profiles WHERE active = 1;",
            [],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative profile count `{count}`")))
    }
}

fn select_one(
    conn: &Connection,
    filter_sql: &str,
    params: impl Params,
) -> RepoResult<Option<Profile>> {
    let mut stmt = conn.prepare(&format!("{PROFILE_SELECT_SQL} {filter_sql} LIMIT 1;"))?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_profile_row(row)?));
    }

    Ok(None)
}

fn select_active_by_id(conn: &Connection, id: ProfileId) -> RepoResult<Option<Profile>> {
    select_one(conn, "WHERE id = ?1 AND active = 1", [id])
}

fn select_active_by_email(conn: &Connection, email: &str) -> RepoResult<Option<Profile>> {
    select_one(
        conn,
        "WHERE email = ?1 COLLATE NOCASE AND active = 1",
        [email.trim()],
    )
}

fn email_taken(conn: &Connection, email: &str) -> RepoResult<bool> {
    let taken = conn
        .query_row(
            "SELECT 1 FROM profiles WHERE email = ?1 COLLATE NOCASE LIMIT 1;",
            [email.trim()],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    Ok(taken)
}

/// Maps the storage-level UNIQUE(email) violation onto `Conflict`.
fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::conflict(email)
        }
        _ => err.into(),
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let active = match row.get::<_, i64>("active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid active value `{other}` in profiles.active"
            )));
        }
    };

    Ok(Profile::from_stored(
        row.get("id")?,
        row.get("name")?,
        row.get("email")?,
        row.get("secret")?,
        row.get("age")?,
        active,
        row.get("created_at")?,
        row.get("updated_at")?,
    ))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
