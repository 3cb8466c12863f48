//! Application state shared across handlers.

use profile_core::{ProfileRepository, ProfileService};
use std::sync::Arc;

/// Shared handle to the profile service.
pub struct AppState<R: ProfileRepository> {
    inner: Arc<ProfileService<R>>,
}

impl<R: ProfileRepository> AppState<R> {
    pub fn new(repo: R) -> Self {
        Self {
            inner: Arc::new(ProfileService::new(repo)),
        }
    }

    pub fn service(&self) -> &ProfileService<R> {
        &self.inner
    }
}

impl<R: ProfileRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
