//! Record repositories.
//!
//! [`RecordRepository`] orchestrates insert, find, update and search for one
//! entity type over a [`StoragePort`](crate::core::StoragePort). It maps
//! domain records to persistence records and back, hands filter construction
//! to [`crate::search`], and turns store-reported write counts into
//! [`WriteError`] faults. Errors raised by the port itself are returned as
//! they are.
//!
//! Each call is a single attempt: nothing is retried or rolled back.


use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{DynStoragePort, FindOptions, InsertOptions, StoragePort, UpdateOptions};
use crate::error::{BackendError, StorageResult, WriteError};
use crate::records::{Entity, PRIMARY_KEY, Patient, PatientTest, SHARD_KEY, require_id};
use crate::search::build_filter;
use crate::types::{Document, Filter, Fragment, SearchCriteria, UpdatePatch};

/// Repository for patients.
pub type PatientRepository = RecordRepository<Patient>;

/// Repository for patient tests.
pub type PatientTestRepository = RecordRepository<PatientTest>;

/// CRUD and search for one entity type.
///
/// Stateless apart from the port it holds; clones share that port.
pub struct RecordRepository<E: Entity> {
    port: DynStoragePort,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for RecordRepository<E> {
    fn clone(&self) -> Self {
        Self {
            port: self.port.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for RecordRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordRepository")
            .field("entity", &E::KIND)
            .field("backend", &self.port.backend_name())
            .finish()
    }
}

impl<E: Entity> RecordRepository<E> {
    /// Creates a repository over `port`.
    pub fn new(port: DynStoragePort) -> Self {
        Self {
            port,
            _entity: PhantomData,
        }
    }

    /// Returns the port this repository writes to.
    pub fn port(&self) -> &DynStoragePort {
        &self.port
    }

    /// Stores a new record and returns its id.
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingRequiredField` - If the record has no id
    /// * `WriteError::InsertFailed` - If the store reports nothing inserted
    ///   (e.g. the id is already taken)
    /// * Any error from the port, unchanged
    pub async fn insert(&self, record: E) -> StorageResult<String> {
        let id = require_id(record.id())?;
        let document = to_document(&record.into_stored()?)?;

        let result = self
            .port
            .insert_one(document, &InsertOptions::default())
            .await?;

        if result.inserted_count > 0 {
            debug!(entity = E::KIND, id = %id, "inserted record");
            Ok(id)
        } else {
            warn!(entity = E::KIND, id = %id, "store reported no inserted document");
            Err(WriteError::InsertFailed {
                entity: E::KIND.to_string(),
                id,
            }
            .into())
        }
    }

    /// Loads the record whose logical `id` matches.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub async fn find_by_id(&self, id: &str) -> StorageResult<Option<E>> {
        let filter = Filter::match_all().with(Fragment::eq("id", id));
        debug!(entity = E::KIND, query = %filter, "find by id");

        let document = self
            .port
            .find_one(&filter, &FindOptions::default())
            .await?;

        document.map(from_document::<E>).transpose()
    }

    /// Writes the record's fields over the stored record with the same id and
    /// returns the id.
    ///
    /// Only fields present on `record` are written; stored fields it leaves
    /// unset are kept.
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingRequiredField` - If the record has no id
    /// * `WriteError::UpdateFailed` - If the store reports nothing modified
    ///   (no such record, or no field changed)
    /// * Any error from the port, unchanged
    pub async fn update(&self, record: E) -> StorageResult<String> {
        let id = require_id(record.id())?;
        let mut fields = to_document(&record.into_stored()?)?;
        fields.remove(PRIMARY_KEY);
        fields.remove(SHARD_KEY);

        let filter = Filter::new(vec![
            Fragment::eq(PRIMARY_KEY, id.as_str()),
            Fragment::eq(SHARD_KEY, id.as_str()),
        ]);
        let patch = UpdatePatch::set(fields);
        debug!(entity = E::KIND, id = %id, fields = patch.fields().len(), "update");

        let result = self
            .port
            .update_one(&filter, &patch, &UpdateOptions::default())
            .await?;

        if result.modified_count > 0 {
            Ok(id)
        } else {
            warn!(
                entity = E::KIND,
                id = %id,
                matched = result.matched_count,
                "store reported no modified document"
            );
            Err(WriteError::UpdateFailed {
                entity: E::KIND.to_string(),
                id,
            }
            .into())
        }
    }

    /// Returns every record matching `search`. An empty search returns every
    /// record.
    pub async fn search(&self, search: &E::Search) -> StorageResult<Vec<E>> {
        self.search_criteria(E::search_criteria(search)).await
    }

    /// Returns every record matching loosely-typed `criteria`, with this
    /// entity's date ranges applied.
    pub async fn search_criteria(&self, criteria: SearchCriteria) -> StorageResult<Vec<E>> {
        let filter = build_filter(criteria, E::DATE_RANGES);
        self.find_many(&filter).await
    }

    async fn find_many(&self, filter: &Filter) -> StorageResult<Vec<E>> {
        debug!(
            entity = E::KIND,
            fragments = filter.len(),
            query = %filter,
            "search"
        );

        let documents = self
            .port
            .find_many(filter, &FindOptions::default())
            .await?;

        documents.into_iter().map(from_document::<E>).collect()
    }
}

fn to_document<S: serde::Serialize>(stored: &S) -> StorageResult<Document> {
    match serde_json::to_value(stored)? {
        Value::Object(document) => Ok(document),
        other => Err(BackendError::SerializationError {
            message: format!("record serialized to a non-object value: {}", other),
        }
        .into()),
    }
}

fn from_document<E: Entity>(document: Document) -> StorageResult<E> {
    let stored: E::Stored = serde_json::from_value(Value::Object(document))?;
    Ok(E::from_stored(stored))
}
