//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations transports expose.
//! - Keep transport layers decoupled from storage details.

pub mod profile_service;
