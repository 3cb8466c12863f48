//! Core domain logic for the profile record service.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, ProfileStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::profile::{
    Age, NewProfile, Profile, ProfileId, ProfileListItem, ProfilePatch, PublicProfile, Secret,
};
pub use model::validation::{FieldError, ValidationErrors};
pub use repo::memory_repo::InMemoryProfileRepository;
pub use repo::profile_repo::{
    ProfileRepository, RepoError, RepoResult, SqliteProfileRepository, EMAIL_CONFLICT_MESSAGE,
};
pub use service::profile_service::{ProfileListing, ProfileService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
