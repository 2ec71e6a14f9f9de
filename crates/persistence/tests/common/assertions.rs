//! Assertion helpers.

use serde_json::Value;

use patient_tests_persistence::error::{StorageError, WriteError};
use patient_tests_persistence::records::{PRIMARY_KEY, SHARD_KEY, STORE_METADATA};

/// Asserts that a serialized record carries no persistence-only field.
///
/// # Panics
///
/// Panics if a key field, a derived date field or store metadata is present.
pub fn assert_no_persistence_fields<T: serde::Serialize>(record: &T) {
    let value = serde_json::to_value(record).expect("record serializes");
    let Value::Object(fields) = value else {
        panic!("record did not serialize to an object");
    };
    let leaked: Vec<&String> = fields
        .keys()
        .filter(|key| {
            [PRIMARY_KEY, SHARD_KEY, "_dateOfBirthDate", "_lastUpdatedDate"].contains(&key.as_str())
                || STORE_METADATA.contains(&key.as_str())
        })
        .collect();
    assert!(
        leaked.is_empty(),
        "persistence-only fields leaked into a domain record: {:?}",
        leaked
    );
}

/// Asserts that an error is `InsertFailed`.
pub fn assert_insert_failed(err: &StorageError) {
    assert!(
        matches!(err, StorageError::Write(WriteError::InsertFailed { .. })),
        "Expected InsertFailed, got {:?}",
        err
    );
}

/// Asserts that an error is `UpdateFailed`.
pub fn assert_update_failed(err: &StorageError) {
    assert!(
        matches!(err, StorageError::Write(WriteError::UpdateFailed { .. })),
        "Expected UpdateFailed, got {:?}",
        err
    );
}

/// Sorted ids of a list of records.
pub fn ids<T, F>(records: &[T], id: F) -> Vec<String>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut ids: Vec<String> = records
        .iter()
        .filter_map(|record| id(record).map(str::to_string))
        .collect();
    ids.sort();
    ids
}
