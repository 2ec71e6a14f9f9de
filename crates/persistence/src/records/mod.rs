//! Domain records and their persistence representations.
//!
//! Each entity comes as a pair of explicit types:
//!
//! - the domain record callers see ([`Patient`], [`PatientTest`])
//! - the persistence record written to the store ([`StoredPatient`],
//!   [`StoredPatientTest`]): the domain record plus `_id`, `_shardKey` and any
//!   derived comparison field
//!
//! The [`Entity`] trait maps between the two in both directions. The mapping
//! back to the domain record is total and drops every persistence-only field.

pub mod patient;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{StorageResult, ValidationError};
use crate::search::DateRangeField;
use crate::types::{Document, SearchCriteria};

pub use patient::{Gender, Patient, PatientSearch, StoredPatient};
pub use patient_test::{PatientTest, PatientTestSearch, StoredPatientTest};

/// Stored name of the primary key.
pub const PRIMARY_KEY: &str = "_id";

/// Stored name of the shard key.
pub const SHARD_KEY: &str = "_shardKey";

/// An entity type the repository can persist.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs.
    const KIND: &'static str;

    /// Date ranges this entity can be searched by.
    const DATE_RANGES: &'static [DateRangeField];

    /// The persistence record.
    type Stored: Serialize + DeserializeOwned + Send;

    /// The typed search request.
    type Search: Send + Sync;

    /// The caller-assigned identifier, if set.
    fn id(&self) -> Option<&str>;

    /// Builds the persistence record.
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingRequiredField` - If `id` is not set
    fn into_stored(self) -> StorageResult<Self::Stored>;

    /// Recovers the domain record, dropping every persistence-only field.
    fn from_stored(stored: Self::Stored) -> Self;

    /// Lowers a typed search request into criteria, in field order.
    fn search_criteria(search: &Self::Search) -> SearchCriteria;
}

/// Returns the caller-assigned id or a `MissingRequiredField` error.
pub(crate) fn require_id(id: Option<&str>) -> StorageResult<String> {
    match id {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ValidationError::MissingRequiredField {
            field: "id".to_string(),
        }
        .into()),
    }
}

/// Metadata fields a document store may add to every stored document.
pub const STORE_METADATA: &[&str] = &["_etag", "_rid", "_self", "_ts", "_attachments"];

/// Returns true when `key` is owned by the persistence record: a key field,
/// a field derived for one of `ranges`, or store metadata.
pub(crate) fn is_reserved(key: &str, ranges: &[DateRangeField]) -> bool {
    key == PRIMARY_KEY
        || key == SHARD_KEY
        || STORE_METADATA.contains(&key)
        || ranges.iter().any(|range| range.target == key)
}

/// Drops keys the persistence record owns from a record's unknown fields, so
/// a caller cannot smuggle a key or derived value into storage and none leaks
/// back out. Other unknown fields are kept, underscore or not.
pub(crate) fn strip_reserved(extra: &mut Document, ranges: &[DateRangeField]) {
    extra.retain(|key, _| !is_reserved(key, ranges));
}
