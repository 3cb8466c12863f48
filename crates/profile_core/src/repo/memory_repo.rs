//! In-memory profile repository.
//!
//! Mirrors `SqliteProfileRepository` semantics (monotonic ids, soft delete,
//! case-insensitive email uniqueness) without a database, so callers of
//! `ProfileRepository` can be exercised in isolation.

use crate::db::DbError;
use crate::model::profile::{NewProfile, Profile, ProfileId, ProfilePatch};
use crate::repo::profile_repo::{ProfileRepository, RepoError, RepoResult};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    last_id: ProfileId,
    rows: Vec<Profile>,
}

impl MemoryState {
    fn active_by_id(&mut self, id: ProfileId) -> Option<&mut Profile> {
        self.rows
            .iter_mut()
            .find(|profile| profile.is_active() && profile.id() == Some(id))
    }

    fn active_by_email(&self, email: &str) -> Option<&Profile> {
        self.rows
            .iter()
            .find(|profile| profile.is_active() && profile.has_email(email))
    }
}

/// `ProfileRepository` backed by a guarded `Vec`.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RepoError::Db(DbError::LockPoisoned))
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn find_all(&self) -> RepoResult<Vec<Profile>> {
        let state = self.lock()?;
        Ok(state
            .rows
            .iter()
            .filter(|profile| profile.is_active())
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let mut state = self.lock()?;
        Ok(state.active_by_id(id).cloned())
    }

    fn find_by_id_including_inactive(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let state = self.lock()?;
        Ok(state
            .rows
            .iter()
            .find(|profile| profile.id() == Some(id))
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>> {
        let state = self.lock()?;
        Ok(state.active_by_email(email).cloned())
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let state = self.lock()?;
        Ok(state.rows.iter().any(|profile| profile.has_email(email)))
    }

    fn create(&self, input: NewProfile) -> RepoResult<Profile> {
        let mut profile = Profile::new(input);
        profile.validate()?;

        let mut state = self.lock()?;
        if state.rows.iter().any(|other| other.has_email(&profile.email)) {
            return Err(RepoError::conflict(&profile.email));
        }

        state.last_id += 1;
        profile.assign_id(state.last_id);
        state.rows.push(profile.clone());
        Ok(profile)
    }

    fn update(&self, id: ProfileId, patch: &ProfilePatch) -> RepoResult<Profile> {
        let mut state = self.lock()?;
        let mut profile = state
            .active_by_id(id)
            .cloned()
            .ok_or(RepoError::NotFound(id))?;

        if profile.apply_patch(patch) {
            let taken = state
                .active_by_email(&profile.email)
                .is_some_and(|holder| holder.id() != Some(id));
            if taken {
                return Err(RepoError::conflict(&profile.email));
            }
        }
        profile.validate()?;
        // Soft-deleted rows keep their email reserved.
        if state
            .rows
            .iter()
            .any(|other| other.id() != Some(id) && other.has_email(&profile.email))
        {
            return Err(RepoError::conflict(&profile.email));
        }
        profile.touch();

        let slot = state.active_by_id(id).ok_or(RepoError::NotFound(id))?;
        *slot = profile.clone();
        Ok(profile)
    }

    fn delete(&self, id: ProfileId) -> RepoResult<bool> {
        let mut state = self.lock()?;
        match state.active_by_id(id) {
            Some(profile) => {
                profile.soft_delete();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self) -> RepoResult<usize> {
        let state = self.lock()?;
        Ok(state.rows.iter().filter(|profile| profile.is_active()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryProfileRepository;
    use crate::model::profile::{NewProfile, ProfilePatch};
    use crate::repo::profile_repo::{ProfileRepository, RepoError};

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let repo = InMemoryProfileRepository::new();
        let first = repo.create(NewProfile::new("Ana", "ana@test.com")).unwrap();
        assert!(repo.delete(first.id().unwrap()).unwrap());
        let second = repo.create(NewProfile::new("Bea", "bea@test.com")).unwrap();

        assert_eq!(first.id(), Some(1));
        assert_eq!(second.id(), Some(2));
    }

    #[test]
    fn deleted_email_still_blocks_registration() {
        let repo = InMemoryProfileRepository::new();
        let ana = repo.create(NewProfile::new("Ana", "ana@test.com")).unwrap();
        repo.delete(ana.id().unwrap()).unwrap();

        assert!(repo.find_by_email("ana@test.com").unwrap().is_none());
        assert!(repo.email_exists("ANA@test.com").unwrap());
        let err = repo
            .create(NewProfile::new("Ana Again", "ana@test.com"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict { .. }));
    }

    #[test]
    fn update_rejects_active_email_of_another_profile() {
        let repo = InMemoryProfileRepository::new();
        let ana = repo.create(NewProfile::new("Ana", "ana@test.com")).unwrap();
        repo.create(NewProfile::new("Bea", "bea@test.com")).unwrap();

        let err = repo
            .update(ana.id().unwrap(), &ProfilePatch::default().email("BEA@test.com"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict { .. }));
        let reloaded = repo.find_by_id(ana.id().unwrap()).unwrap().unwrap();
        assert_eq!(reloaded.email, "ana@test.com");
    }

    #[test]
    fn update_onto_deleted_profiles_email_is_a_conflict() {
        let repo = InMemoryProfileRepository::new();
        let ana = repo.create(NewProfile::new("Ana", "ana@test.com")).unwrap();
        let bea = repo.create(NewProfile::new("Bea", "bea@test.com")).unwrap();
        assert!(repo.delete(bea.id().unwrap()).unwrap());

        let err = repo
            .update(ana.id().unwrap(), &ProfilePatch::default().email("Bea@Test.com"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict { .. }));
        let reloaded = repo.find_by_id(ana.id().unwrap()).unwrap().unwrap();
        assert_eq!(reloaded.email, "ana@test.com");
        let deleted = repo
            .find_by_id_including_inactive(bea.id().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(deleted.email, "bea@test.com");
    }
}
