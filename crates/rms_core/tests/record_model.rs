use rms_core::{Record, RecordField, ValidationError};

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record = Record {
        id: 3,
        name: "John Doe".to_string(),
        age: 30,
        address: "123 Main St".to_string(),
        contact: "55501000001".to_string(),
        email: "john@example.com".to_string(),
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["name"], "John Doe");
    assert_eq!(json["age"], 30);
    assert_eq!(json["address"], "123 Main St");
    assert_eq!(json["contact"], "55501000001");
    assert_eq!(json["email"], "john@example.com");

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn record_field_serializes_as_snake_case() {
    let json = serde_json::to_value(RecordField::Contact).unwrap();
    assert_eq!(json, "contact");
}

#[test]
fn validation_messages_match_user_facing_copy() {
    assert_eq!(
        ValidationError::MissingField(RecordField::Email).to_string(),
        "Please fill all fields"
    );
    assert_eq!(
        ValidationError::InvalidContactLength.to_string(),
        "Contact number must be exactly 11 digits"
    );
    assert_eq!(
        ValidationError::DuplicateRecord.to_string(),
        "A record with this Name or Email already exists."
    );
}
