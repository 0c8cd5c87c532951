//! Personal record domain model.
//!
//! # Responsibility
//! - Define the stored record shape and the raw form input that produces it.
//!
//! # Invariants
//! - `RecordId` values are assigned by the store and never reused.

pub mod record;
