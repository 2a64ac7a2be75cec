//! Core domain concepts shared across all modules.
//!
//! - [`error::DomainError`] — validation errors
//! - [`id::EntityId`] — numeric identifiers and their allocation rule

pub mod error;
pub mod id;
