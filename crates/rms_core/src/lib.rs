//! Core logic for the personal record manager.
//! This crate owns the record store, the validation rules and the screen
//! state machine; UI shells only render and forward user actions.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;
pub mod service;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordDraft, RecordField, RecordId, RecordInput};
pub use repo::record_repo::{
    RecordRepository, SqliteRecordRepository, StorageError, StorageResult,
};
pub use repo::record_store::RecordStore;
pub use screen::controller::{
    FormMode, FormStatus, Notice, Screen, ScreenController, ScreenMessage,
};
pub use service::record_service::{RecordService, ServiceError, ServiceResult};
pub use service::validation::{
    accepts_contact_keystroke, validate_fields, validation_messages, ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
