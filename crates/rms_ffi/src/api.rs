//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the create/update/delete actions, list refresh and validation
//!   message table to the Dart UI shell.
//! - Flatten core errors into stable codes plus display messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the store for its own duration only.

use log::warn;
use rms_core::config::DB_PATH_ENV;
use rms_core::{
    accepts_contact_keystroke, core_version as core_version_inner,
    init_logging as init_logging_inner, validation_messages as validation_messages_inner, Record,
    RecordId, RecordInput, RecordService, RecordStore, ServiceError, StoreConfig,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const FFI_DB_FILE_NAME: &str = "rms_records.sqlite3";
static FFI_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One record as rendered by list and detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordItem {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub address: String,
    pub contact: String,
    pub email: String,
}

impl From<Record> for RecordItem {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            age: record.age,
            address: record.address,
            contact: record.contact,
            email: record.email,
        }
    }
}

/// List refresh envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordListResponse {
    pub ok: bool,
    /// Records ordered by id; empty on failure.
    pub items: Vec<RecordItem>,
    pub message: String,
}

/// Point lookup envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGetResponse {
    pub ok: bool,
    /// `None` when the id does not exist or the lookup failed.
    pub item: Option<RecordItem>,
    pub message: String,
}

/// Result of a create/update/delete action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordActionResponse {
    pub ok: bool,
    /// Target or newly created record id.
    pub record_id: Option<i64>,
    /// Failure kind code (`missing_field`, ..., `storage_error`).
    pub error_code: Option<String>,
    /// Human-readable message for dialogs and snackbars.
    pub message: String,
}

impl RecordActionResponse {
    fn success(message: impl Into<String>, record_id: RecordId) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(record_id: Option<RecordId>, err: &ServiceError, message: String) -> Self {
        Self {
            ok: false,
            record_id,
            error_code: Some(err.code().to_string()),
            message,
        }
    }
}

/// Validation failure copy keyed by code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessageItem {
    pub code: String,
    pub message: String,
}

/// Reloads every record for the list view.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn records_list() -> RecordListResponse {
    match record_service().list_records() {
        Ok(records) => {
            let items = records.into_iter().map(RecordItem::from).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No records.".to_string()
            } else {
                format!("Loaded {} record(s).", items.len())
            };
            RecordListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => RecordListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("Failed to load records: {err}"),
        },
    }
}

/// Loads one record, e.g. to pre-fill the edit form.
#[flutter_rust_bridge::frb(sync)]
pub fn record_get(record_id: i64) -> RecordGetResponse {
    match record_service().get_record(record_id) {
        Ok(Some(record)) => RecordGetResponse {
            ok: true,
            item: Some(record.into()),
            message: String::new(),
        },
        Ok(None) => RecordGetResponse {
            ok: true,
            item: None,
            message: format!("Record {record_id} no longer exists."),
        },
        Err(err) => RecordGetResponse {
            ok: false,
            item: None,
            message: format!("Failed to load record: {err}"),
        },
    }
}

/// Validates and creates a record from raw form strings.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created id on success, the first failing rule otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn record_create(
    name: String,
    age: String,
    address: String,
    contact: String,
    email: String,
) -> RecordActionResponse {
    let input = RecordInput::new(name, age, address, contact, email);
    match record_service().create_record(&input) {
        Ok(id) => RecordActionResponse::success("Record added.", id),
        Err(err) => RecordActionResponse::failure(None, &err, err.to_string()),
    }
}

/// Validates and overwrites record `record_id` from raw form strings.
#[flutter_rust_bridge::frb(sync)]
pub fn record_update(
    record_id: i64,
    name: String,
    age: String,
    address: String,
    contact: String,
    email: String,
) -> RecordActionResponse {
    let input = RecordInput::new(name, age, address, contact, email);
    match record_service().update_record(record_id, &input) {
        Ok(()) => RecordActionResponse::success("Record updated.", record_id),
        Err(err) => RecordActionResponse::failure(Some(record_id), &err, err.update_message()),
    }
}

/// Deletes record `record_id`; deleting a missing id succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn record_delete(record_id: i64) -> RecordActionResponse {
    match record_service().delete_record(record_id) {
        Ok(()) => RecordActionResponse::success("Record deleted.", record_id),
        Err(err) => RecordActionResponse::failure(Some(record_id), &err, err.to_string()),
    }
}

/// Keystroke filter for the contact text field.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_keystroke_allowed(candidate: String) -> bool {
    accepts_contact_keystroke(&candidate)
}

/// Returns the validation message table, in rule order.
#[flutter_rust_bridge::frb(sync)]
pub fn validation_messages() -> Vec<ValidationMessageItem> {
    validation_messages_inner()
        .into_iter()
        .map(|(code, message)| ValidationMessageItem {
            code: code.to_string(),
            message: message.to_string(),
        })
        .collect()
}

fn record_service() -> RecordService<RecordStore> {
    let store = RecordStore::new(StoreConfig::new(resolve_ffi_db_path()));
    if let Err(err) = store.initialize() {
        // Each later call reports the same failure through its own envelope.
        warn!("event=ffi_store_init module=ffi status=error error={err}");
    }
    RecordService::new(store)
}

fn resolve_ffi_db_path() -> PathBuf {
    FFI_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(FFI_DB_FILE_NAME)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        contact_keystroke_allowed, core_version, init_logging, record_create, record_delete,
        record_get, record_update, records_list, validation_messages,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{}-{nanos}", std::process::id())
    }

    fn create(token: &str) -> super::RecordActionResponse {
        record_create(
            format!("Person {token}"),
            "30".to_string(),
            "123 Main St".to_string(),
            "55501000001".to_string(),
            format!("{token}@example.com"),
        )
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "/tmp/rms-logs".to_string()).is_empty());
    }

    #[test]
    fn create_update_delete_roundtrip() {
        let token = unique_token("crud");
        let created = create(&token);
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.expect("create should return record_id");

        let listed = records_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.id == id));

        let updated = record_update(
            id,
            format!("Person {token}"),
            "31".to_string(),
            "123 Main St".to_string(),
            "55501000001".to_string(),
            format!("{token}@example.com"),
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(record_get(id).item.map(|item| item.age), Some(31));

        let deleted = record_delete(id);
        assert!(deleted.ok, "{}", deleted.message);
        let missing = record_get(id);
        assert!(missing.ok);
        assert!(missing.item.is_none());
    }

    #[test]
    fn duplicate_email_reports_duplicate_code() {
        let token = unique_token("dup");
        assert!(create(&token).ok);

        let second = record_create(
            format!("Other {token}"),
            "40".to_string(),
            "456 Oak Ave".to_string(),
            "55501000002".to_string(),
            format!("{token}@example.com"),
        );
        assert!(!second.ok);
        assert_eq!(second.error_code.as_deref(), Some("duplicate_record"));
        assert_eq!(
            second.message,
            "A record with this Name or Email already exists."
        );
    }

    #[test]
    fn duplicate_on_update_uses_edit_copy() {
        let first = unique_token("upd-a");
        let second = unique_token("upd-b");
        assert!(create(&first).ok);
        let id = create(&second).record_id.expect("second create should succeed");

        let response = record_update(
            id,
            format!("Person {first}"),
            "30".to_string(),
            "123 Main St".to_string(),
            "55501000001".to_string(),
            format!("{second}@example.com"),
        );
        assert!(!response.ok);
        assert_eq!(response.error_code.as_deref(), Some("duplicate_record"));
        assert_eq!(
            response.message,
            "Another record with this Name or Email already exists."
        );
    }

    #[test]
    fn short_contact_reports_length_code() {
        let token = unique_token("short");
        let response = record_create(
            format!("Person {token}"),
            "30".to_string(),
            "123 Main St".to_string(),
            "5550100".to_string(),
            format!("{token}@example.com"),
        );
        assert!(!response.ok);
        assert_eq!(
            response.error_code.as_deref(),
            Some("invalid_contact_length")
        );
    }

    #[test]
    fn deleting_unknown_id_succeeds() {
        assert!(record_delete(i64::MAX).ok);
    }

    #[test]
    fn keystroke_filter_and_message_table_are_exposed() {
        assert!(contact_keystroke_allowed("0917".to_string()));
        assert!(!contact_keystroke_allowed("09a".to_string()));
        let codes = validation_messages()
            .into_iter()
            .map(|item| item.code)
            .collect::<Vec<_>>();
        assert_eq!(codes.first().map(String::as_str), Some("missing_field"));
        assert_eq!(codes.last().map(String::as_str), Some("duplicate_record"));
    }
}
