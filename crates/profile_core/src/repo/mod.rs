//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the profile data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths run `Profile::validate()` before any mutation.
//! - Every read excludes inactive rows, except `email_exists` and
//!   `find_by_id_including_inactive`.
//! - Repository APIs return semantic errors (`Conflict`, `NotFound`) in
//!   addition to storage errors, and never log.

pub mod memory_repo;
pub mod profile_repo;
