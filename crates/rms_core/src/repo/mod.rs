//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record data access contract.
//! - Isolate SQLite query details from validation and screen orchestration.
//!
//! # Invariants
//! - Repositories persist what they are given; field format validation and
//!   the uniqueness policy live in the service layer.
//! - `exists_conflict` is the only uniqueness authority.

pub mod record_repo;
pub mod record_store;
