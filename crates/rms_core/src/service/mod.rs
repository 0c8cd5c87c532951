//! Core use-case services.
//!
//! # Responsibility
//! - Validate raw form input into persistable drafts.
//! - Orchestrate repository calls for create, update, delete and listing.

pub mod record_service;
pub mod validation;
