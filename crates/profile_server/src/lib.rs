//! HTTP transport for the profile record service.
//!
//! # Responsibility
//! - Map HTTP requests onto `ProfileService` operations.
//! - Shape every outcome into the `{success, message, data|errors, count?}`
//!   envelope with the matching status code.
//!
//! # Invariants
//! - Handlers never touch storage directly.
//! - Storage faults are logged here and surfaced as a generic 500.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use response::ApiResponse;
pub use server::{build_router, run_server, ServerError};
pub use state::AppState;
