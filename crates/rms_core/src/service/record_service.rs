//! Record use-case service.
//!
//! # Responsibility
//! - Run the full validation sequence, uniqueness included.
//! - Persist validated drafts through a `RecordRepository`.
//!
//! # Invariants
//! - No write reaches the repository without passing `validate`.
//! - Update excludes the record's own id from the uniqueness check.
//! - Logged events carry ids and counts, never field values.

use crate::model::record::{Record, RecordDraft, RecordId, RecordInput};
use crate::repo::record_repo::{RecordRepository, StorageError, StorageResult};
use crate::service::validation::{validate_fields, ValidationError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a record use-case.
#[derive(Debug)]
pub enum ServiceError {
    /// User input was rejected; the user is expected to correct it.
    Validation(ValidationError),
    /// The store failed; surfaced verbatim, the user may retry.
    Storage(StorageError),
}

impl ServiceError {
    /// Stable machine-readable code for UI shells.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::Storage(_) => "storage_error",
        }
    }

    /// Display text for failures of the edit flow.
    pub fn update_message(&self) -> String {
        match self {
            Self::Validation(err) => err.update_message().to_string(),
            Self::Storage(err) => err.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Use-case service wrapper for record operations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Runs every validation rule in order, uniqueness last.
    ///
    /// `exclude_id` is the record being edited, if any.
    pub fn validate(
        &self,
        input: &RecordInput,
        exclude_id: Option<RecordId>,
    ) -> ServiceResult<RecordDraft> {
        let draft = validate_fields(input)?;
        if self
            .repo
            .exists_conflict(&draft.name, &draft.email, exclude_id)?
        {
            return Err(ValidationError::DuplicateRecord.into());
        }
        Ok(draft)
    }

    /// Validates and inserts a new record, returning its id.
    pub fn create_record(&self, input: &RecordInput) -> ServiceResult<RecordId> {
        let started_at = Instant::now();
        let result = self
            .validate(input, None)
            .and_then(|draft| self.repo.add_record(&draft).map_err(ServiceError::from));

        match &result {
            Ok(id) => info!(
                "event=record_create module=service status=ok record_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("record_create", None, err),
        }
        result
    }

    /// Validates and overwrites record `id`.
    ///
    /// Updating an id that no longer exists is a silent no-op.
    pub fn update_record(&self, id: RecordId, input: &RecordInput) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self
            .validate(input, Some(id))
            .and_then(|draft| {
                self.repo
                    .update_record(id, &draft)
                    .map_err(ServiceError::from)
            });

        match result {
            Ok(changed) => {
                info!(
                    "event=record_update module=service status=ok record_id={id} changed={changed} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_failure("record_update", Some(id), &err);
                Err(err)
            }
        }
    }

    /// Deletes record `id`; missing ids are a no-op.
    pub fn delete_record(&self, id: RecordId) -> ServiceResult<()> {
        match self.repo.delete_record(id) {
            Ok(removed) => {
                info!("event=record_delete module=service status=ok record_id={id} removed={removed}");
                Ok(())
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("record_delete", Some(id), &err);
                Err(err)
            }
        }
    }

    pub fn list_records(&self) -> StorageResult<Vec<Record>> {
        self.repo.get_all_records()
    }

    pub fn get_record(&self, id: RecordId) -> StorageResult<Option<Record>> {
        self.repo.get_record_by_id(id)
    }
}

fn log_failure(event: &str, id: Option<RecordId>, err: &ServiceError) {
    let record_id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match err {
        ServiceError::Validation(reason) => warn!(
            "event={event} module=service status=rejected record_id={record_id} error_code={}",
            reason.code()
        ),
        ServiceError::Storage(storage) => error!(
            "event={event} module=service status=error record_id={record_id} error_code=storage_error error={storage}"
        ),
    }
}
