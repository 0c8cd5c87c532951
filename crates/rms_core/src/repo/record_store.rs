//! File-backed record store with per-call connection scope.
//!
//! # Responsibility
//! - Own the database location and expose `initialize()`.
//! - Serve every `RecordRepository` call on its own freshly opened
//!   connection.
//!
//! # Invariants
//! - A connection never outlives the call that opened it, on success or
//!   error paths alike.
//! - `initialize()` is idempotent and never drops existing rows.

use crate::config::StoreConfig;
use crate::db::open_db;
use crate::model::record::{Record, RecordDraft, RecordId};
use crate::repo::record_repo::{RecordRepository, SqliteRecordRepository, StorageResult};
use log::{error, info};
use std::path::Path;

/// Record store bound to one SQLite file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn db_path(&self) -> &Path {
        &self.config.db_path
    }

    /// Ensures the backing file and `records` table exist.
    ///
    /// # Errors
    /// - Returns `StorageError` when the file is unreachable, corrupt, or
    ///   carries a schema newer than this binary supports.
    pub fn initialize(&self) -> StorageResult<()> {
        match self.with_repo(|_| Ok(())) {
            Ok(()) => {
                info!("event=store_init module=repo status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=store_init module=repo status=error error={err}");
                Err(err)
            }
        }
    }

    fn with_repo<T>(
        &self,
        f: impl FnOnce(&SqliteRecordRepository<'_>) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let conn = open_db(&self.config.db_path)?;
        let repo = SqliteRecordRepository::try_new(&conn)?;
        f(&repo)
    }
}

impl RecordRepository for RecordStore {
    fn add_record(&self, draft: &RecordDraft) -> StorageResult<RecordId> {
        self.with_repo(|repo| repo.add_record(draft))
    }

    fn get_all_records(&self) -> StorageResult<Vec<Record>> {
        self.with_repo(|repo| repo.get_all_records())
    }

    fn get_record_by_id(&self, id: RecordId) -> StorageResult<Option<Record>> {
        self.with_repo(|repo| repo.get_record_by_id(id))
    }

    fn update_record(&self, id: RecordId, draft: &RecordDraft) -> StorageResult<usize> {
        self.with_repo(|repo| repo.update_record(id, draft))
    }

    fn delete_record(&self, id: RecordId) -> StorageResult<usize> {
        self.with_repo(|repo| repo.delete_record(id))
    }

    fn exists_conflict(
        &self,
        name: &str,
        email: &str,
        exclude_id: Option<RecordId>,
    ) -> StorageResult<bool> {
        self.with_repo(|repo| repo.exists_conflict(name, email, exclude_id))
    }
}
