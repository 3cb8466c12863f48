//! Profile use-case service.
//!
//! # Responsibility
//! - Provide the list/get/create/update/delete entry points for transports.
//! - Hand out projections only, so the secret never leaves the core.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::profile::{NewProfile, ProfileId, ProfileListItem, ProfilePatch, PublicProfile};
use crate::repo::profile_repo::{ProfileRepository, RepoResult};

/// Listing result with the active-profile count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileListing {
    pub items: Vec<ProfileListItem>,
    pub count: usize,
}

/// Use-case service wrapper for profile operations.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists active profiles in their listing projection.
    pub fn list(&self) -> RepoResult<ProfileListing> {
        let items: Vec<ProfileListItem> = self
            .repo
            .find_all()?
            .iter()
            .map(|profile| profile.to_list_view())
            .collect();
        let count = items.len();
        Ok(ProfileListing { items, count })
    }

    /// Gets one active profile.
    pub fn get(&self, id: ProfileId) -> RepoResult<Option<PublicProfile>> {
        Ok(self.repo.find_by_id(id)?.map(|profile| profile.to_public_view()))
    }

    /// Creates a profile.
    ///
    /// Returns `Validation` or `Conflict` errors unchanged from the repository.
    pub fn create(&self, input: NewProfile) -> RepoResult<PublicProfile> {
        Ok(self.repo.create(input)?.to_public_view())
    }

    /// Applies a partial update to an active profile.
    pub fn update(&self, id: ProfileId, patch: &ProfilePatch) -> RepoResult<PublicProfile> {
        Ok(self.repo.update(id, patch)?.to_public_view())
    }

    /// Soft-deletes a profile. Returns `false` when no active profile matched.
    pub fn delete(&self, id: ProfileId) -> RepoResult<bool> {
        self.repo.delete(id)
    }

    /// Number of active profiles.
    pub fn count(&self) -> RepoResult<usize> {
        self.repo.count()
    }
}
