//! Presentation state for host UI shells.
//!
//! # Responsibility
//! - Model list/create/edit screens as explicit state driven by messages.
//! - Keep shells free of validation and persistence decisions.

pub mod controller;
