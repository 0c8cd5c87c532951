//! Flutter-facing bindings for the record manager core.

pub mod api;
