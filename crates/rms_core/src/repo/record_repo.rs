//! Record repository contract and borrowed-connection SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and conflict lookup over the `records` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Update and delete of a missing id affect zero rows and succeed.
//! - Point reads reject invalid persisted state instead of masking it.
//! - One unreadable row never hides the rest of the table from listing.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::record::{Record, RecordDraft, RecordId};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORDS_TABLE: &str = "records";
const REQUIRED_RECORD_COLUMNS: &[&str] = &["id", "name", "age", "address", "contact", "email"];

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    address,
    contact,
    email
FROM records";

pub type StorageResult<T> = Result<T, StorageError>;

/// Operational failure of the record store.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record CRUD and uniqueness lookups.
pub trait RecordRepository {
    /// Inserts a row and returns the newly assigned id.
    fn add_record(&self, draft: &RecordDraft) -> StorageResult<RecordId>;
    /// Returns every readable record ordered by id.
    ///
    /// Rows that cannot be read back (e.g. a legacy non-positive age) are
    /// skipped and logged; point lookups still report them as `InvalidData`.
    fn get_all_records(&self) -> StorageResult<Vec<Record>>;
    fn get_record_by_id(&self, id: RecordId) -> StorageResult<Option<Record>>;
    /// Overwrites all fields of `id`. Returns the number of rows changed.
    fn update_record(&self, id: RecordId, draft: &RecordDraft) -> StorageResult<usize>;
    /// Removes `id`. Returns the number of rows removed.
    fn delete_record(&self, id: RecordId) -> StorageResult<usize>;
    /// Returns whether a record other than `exclude_id` shares `name` or `email`.
    fn exists_conflict(
        &self,
        name: &str,
        email: &str,
        exclude_id: Option<RecordId>,
    ) -> StorageResult<bool>;
}

/// SQLite-backed record repository over a borrowed connection.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection that has been opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `records` shape.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StorageError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_records_schema(conn)?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn add_record(&self, draft: &RecordDraft) -> StorageResult<RecordId> {
        self.conn.execute(
            "INSERT INTO records (name, age, address, contact, email)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.name.as_str(),
                draft.age,
                draft.address.as_str(),
                draft.contact.as_str(),
                draft.email.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_all_records(&self) -> StorageResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            match parse_record_row(row) {
                Ok(record) => records.push(record),
                Err(StorageError::InvalidData(reason)) => {
                    let id = row.get::<_, RecordId>("id")?;
                    warn!(
                        "event=record_list module=repo status=skipped record_id={id} error_code=invalid_data error={reason}"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(records)
    }

    fn get_record_by_id(&self, id: RecordId) -> StorageResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn update_record(&self, id: RecordId, draft: &RecordDraft) -> StorageResult<usize> {
        let changed = self.conn.execute(
            "UPDATE records
             SET
                name = ?1,
                age = ?2,
                address = ?3,
                contact = ?4,
                email = ?5
             WHERE id = ?6;",
            params![
                draft.name.as_str(),
                draft.age,
                draft.address.as_str(),
                draft.contact.as_str(),
                draft.email.as_str(),
                id,
            ],
        )?;

        Ok(changed)
    }

    fn delete_record(&self, id: RecordId) -> StorageResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id])?;
        Ok(removed)
    }

    fn exists_conflict(
        &self,
        name: &str,
        email: &str,
        exclude_id: Option<RecordId>,
    ) -> StorageResult<bool> {
        let conflict = self
            .conn
            .query_row(
                "SELECT 1
                 FROM records
                 WHERE (name = ?1 OR email = ?2)
                   AND (?3 IS NULL OR id != ?3)
                 LIMIT 1;",
                params![name, email, exclude_id],
                |_| Ok(()),
            )
            .optional()?;

        Ok(conflict.is_some())
    }
}

fn ensure_records_schema(conn: &Connection) -> StorageResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [RECORDS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(StorageError::MissingRequiredTable(RECORDS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([RECORDS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_RECORD_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(StorageError::MissingRequiredColumn {
                table: RECORDS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_record_row(row: &Row<'_>) -> StorageResult<Record> {
    let id: RecordId = row.get("id")?;

    let age = match row.get::<_, Option<i64>>("age")? {
        Some(value) if value > 0 => u32::try_from(value).map_err(|_| {
            StorageError::InvalidData(format!("age `{value}` out of range in records.age (id={id})"))
        })?,
        Some(value) => {
            return Err(StorageError::InvalidData(format!(
                "non-positive age `{value}` in records.age (id={id})"
            )));
        }
        None => {
            return Err(StorageError::InvalidData(format!(
                "missing value in records.age (id={id})"
            )));
        }
    };

    Ok(Record {
        id,
        name: row.get("name")?,
        age,
        address: required_text(row, "address", id)?,
        contact: required_text(row, "contact", id)?,
        email: required_text(row, "email", id)?,
    })
}

fn required_text(row: &Row<'_>, column: &str, id: RecordId) -> StorageResult<String> {
    row.get::<_, Option<String>>(column)?.ok_or_else(|| {
        StorageError::InvalidData(format!("missing value in records.{column} (id={id})"))
    })
}
