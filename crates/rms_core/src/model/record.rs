//! Record domain model.
//!
//! # Responsibility
//! - Define the persisted `Record` and its id-less `RecordDraft`.
//! - Define `RecordInput`, the untrusted string form of a record.
//!
//! # Invariants
//! - A `RecordDraft` is only produced by validation; its fields are trimmed.
//! - `id` is immutable once assigned by the store.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned record identifier (SQLite rowid).
pub type RecordId = i64;

/// One person's stored identity and contact entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub address: String,
    /// Eleven ASCII digits.
    pub contact: String,
    pub email: String,
}

impl Record {
    /// Attaches a store-assigned id to validated field values.
    pub fn from_draft(id: RecordId, draft: RecordDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            address: draft.address,
            contact: draft.contact,
            email: draft.email,
        }
    }

    /// Returns field values without the id.
    pub fn to_draft(&self) -> RecordDraft {
        RecordDraft {
            name: self.name.clone(),
            age: self.age,
            address: self.address.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
        }
    }
}

/// Validated field values ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    pub age: u32,
    pub address: String,
    pub contact: String,
    pub email: String,
}

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Name,
    Age,
    Address,
    Contact,
    Email,
}

impl RecordField {
    /// All fields in the order forms present (and validation checks) them.
    pub const ALL: [RecordField; 5] = [
        RecordField::Name,
        RecordField::Age,
        RecordField::Address,
        RecordField::Contact,
        RecordField::Email,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Age => "Age",
            Self::Address => "Address",
            Self::Contact => "Contact",
            Self::Email => "Email",
        }
    }
}

impl Display for RecordField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw, untrimmed field strings as entered in a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    pub age: String,
    pub address: String,
    pub contact: String,
    pub email: String,
}

impl RecordInput {
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        address: impl Into<String>,
        contact: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            address: address.into(),
            contact: contact.into(),
            email: email.into(),
        }
    }

    /// Pre-fills an edit form from a stored record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age.to_string(),
            address: record.address.clone(),
            contact: record.contact.clone(),
            email: record.email.clone(),
        }
    }

    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Name => &self.name,
            RecordField::Age => &self.age,
            RecordField::Address => &self.address,
            RecordField::Contact => &self.contact,
            RecordField::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let slot = match field {
            RecordField::Name => &mut self.name,
            RecordField::Age => &mut self.age,
            RecordField::Address => &mut self.address,
            RecordField::Contact => &mut self.contact,
            RecordField::Email => &mut self.email,
        };
        *slot = value.into();
    }

    /// Resets every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
