use rms_core::db::migrations::latest_version;
use rms_core::db::open_db_in_memory;
use rms_core::{RecordDraft, RecordRepository, SqliteRecordRepository, StorageError};
use rusqlite::Connection;
use std::collections::HashSet;

fn draft(name: &str, email: &str) -> RecordDraft {
    RecordDraft {
        name: name.to_string(),
        age: 30,
        address: "123 Main St".to_string(),
        contact: "55501000001".to_string(),
        email: email.to_string(),
    }
}

#[test]
fn add_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let input = draft("John Doe", "john@example.com");
    let id = repo.add_record(&input).unwrap();

    let loaded = repo.get_record_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.to_draft(), input);
}

#[test]
fn assigned_ids_are_unique_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let first = repo.add_record(&draft("A", "a@example.com")).unwrap();
    let second = repo.add_record(&draft("B", "b@example.com")).unwrap();
    assert!(second > first);

    repo.delete_record(second).unwrap();
    let third = repo.add_record(&draft("C", "c@example.com")).unwrap();
    assert!(third > second);

    let ids: HashSet<_> = repo
        .get_all_records()
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, HashSet::from([first, third]));
}

#[test]
fn get_all_records_is_empty_then_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    assert!(repo.get_all_records().unwrap().is_empty());

    let a = repo.add_record(&draft("A", "a@example.com")).unwrap();
    let b = repo.add_record(&draft("B", "b@example.com")).unwrap();

    let names = repo
        .get_all_records()
        .unwrap()
        .into_iter()
        .map(|record| (record.id, record.name))
        .collect::<Vec<_>>();
    assert_eq!(names, vec![(a, "A".to_string()), (b, "B".to_string())]);
}

#[test]
fn update_changes_only_the_target_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.add_record(&draft("A", "a@example.com")).unwrap();
    let b = repo.add_record(&draft("B", "b@example.com")).unwrap();
    repo.add_record(&draft("C", "c@example.com")).unwrap();
    let before = repo.get_all_records().unwrap();

    let mut changed = draft("B2", "b2@example.com");
    changed.age = 31;
    assert_eq!(repo.update_record(b, &changed).unwrap(), 1);

    let after = repo.get_all_records().unwrap();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == b {
            assert_eq!(new.to_draft(), changed);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn update_and_delete_of_missing_id_are_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    repo.add_record(&draft("A", "a@example.com")).unwrap();

    assert_eq!(repo.update_record(404, &draft("X", "x@example.com")).unwrap(), 0);
    assert_eq!(repo.delete_record(404).unwrap(), 0);
    assert!(repo.get_record_by_id(404).unwrap().is_none());
    assert_eq!(repo.get_all_records().unwrap().len(), 1);
}

#[test]
fn delete_then_get_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let id = repo.add_record(&draft("A", "a@example.com")).unwrap();
    assert_eq!(repo.delete_record(id).unwrap(), 1);
    assert!(repo.get_record_by_id(id).unwrap().is_none());
    assert_eq!(repo.delete_record(id).unwrap(), 0);
}

#[test]
fn exists_conflict_matches_name_or_email() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let id = repo.add_record(&draft("John Doe", "john@example.com")).unwrap();

    assert!(repo
        .exists_conflict("John Doe", "other@example.com", None)
        .unwrap());
    assert!(repo
        .exists_conflict("Someone Else", "john@example.com", None)
        .unwrap());
    assert!(!repo
        .exists_conflict("john doe", "JOHN@example.com", None)
        .unwrap());
    assert!(!repo
        .exists_conflict("John Doe", "john@example.com", Some(id))
        .unwrap());
}

#[test]
fn exists_conflict_with_exclusion_still_sees_other_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let a = repo.add_record(&draft("A", "a@example.com")).unwrap();
    repo.add_record(&draft("B", "b@example.com")).unwrap();

    assert!(repo.exists_conflict("A", "b@example.com", Some(a)).unwrap());
}

#[test]
fn persisted_non_positive_age_fails_point_lookup_but_not_listing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let good = repo.add_record(&draft("Good", "good@example.com")).unwrap();
    conn.execute(
        "INSERT INTO records (name, age, address, contact, email)
         VALUES ('Broken', 0, 'x', '09170000000', 'broken@example.com');",
        [],
    )
    .unwrap();
    let broken = conn.last_insert_rowid();

    let listed = repo.get_all_records().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good);

    let err = repo.get_record_by_id(broken).unwrap_err();
    assert!(matches!(err, StorageError::InvalidData(_)));
    assert_eq!(repo.delete_record(broken).unwrap(), 1);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteRecordRepository::try_new(&conn) {
        Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_records_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteRecordRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(StorageError::MissingRequiredTable("records"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER,
            address TEXT,
            contact TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteRecordRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(StorageError::MissingRequiredColumn {
            table: "records",
            column: "email"
        })
    ));
}
