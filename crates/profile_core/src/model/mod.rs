//! Domain model for user profile records.
//!
//! # Responsibility
//! - Define the canonical profile record and its input shapes.
//! - Own field-level validation rules and output projections.
//!
//! # Invariants
//! - A persisted profile is identified by a store-assigned `ProfileId`.
//! - Deletion is represented by clearing the `active` flag, never by removal.
//! - The secret never appears in any projection.

pub mod profile;
pub mod validation;
