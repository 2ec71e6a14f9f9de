//! The storage port.
//!
//! This module defines the [`StoragePort`] trait, the only thing repositories
//! know about a store: one collection of JSON documents with insert-one,
//! find-one, find-many and update-one.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::StorageResult;
use crate::types::{Document, Filter, UpdatePatch};

/// Options for [`StoragePort::insert_one`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOptions {
    /// Free-form tag attached to the operation in store-side logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Options for [`StoragePort::find_one`] and [`StoragePort::find_many`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOptions {
    /// Top-level fields to return. `None` returns whole documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Vec<String>>,

    /// Free-form tag attached to the operation in store-side logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Options for [`StoragePort::update_one`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    /// Insert a document built from the filter and patch when nothing matches.
    pub upsert: bool,

    /// Free-form tag attached to the operation in store-side logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Outcome of an insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOneResult {
    /// Number of documents the store reports as inserted.
    pub inserted_count: u64,
    /// Primary key of the inserted document, if any.
    pub inserted_id: Option<Value>,
}

/// Outcome of an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    /// Number of documents matching the filter.
    pub matched_count: u64,
    /// Number of documents actually changed.
    pub modified_count: u64,
    /// Primary key of a document created by an upsert.
    pub upserted_id: Option<Value>,
}

/// A single collection in a document store.
///
/// Implementations must be safe to share between tasks; repositories hold
/// them behind an `Arc` and call them concurrently. Transport failures are
/// reported as [`StorageError::Backend`](crate::error::StorageError::Backend).
///
/// # Example
///
/// ```ignore
/// use patient_tests_persistence::core::{FindOptions, StoragePort};
/// use patient_tests_persistence::types::{Filter, Fragment};
///
/// async fn find_doe<P: StoragePort>(port: &P) -> StorageResult<usize> {
///     let filter = Filter::match_all().with(Fragment::eq("lastName", "Doe"));
///     let found = port.find_many(&filter, &FindOptions::default()).await?;
///     Ok(found.len())
/// }
/// ```
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Returns a short name for the backing store (e.g. "memory").
    fn backend_name(&self) -> &'static str;

    /// Inserts one document.
    async fn insert_one(
        &self,
        document: Document,
        options: &InsertOptions,
    ) -> StorageResult<InsertOneResult>;

    /// Returns the first document matching `filter`, or `None`.
    async fn find_one(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Option<Document>>;

    /// Returns every document matching `filter`. An empty filter returns the
    /// whole collection.
    async fn find_many(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Vec<Document>>;

    /// Applies `update` to the first document matching `filter`.
    async fn update_one(
        &self,
        filter: &Filter,
        update: &UpdatePatch,
        options: &UpdateOptions,
    ) -> StorageResult<UpdateResult>;
}

/// A shared, dynamically typed storage port.
pub type DynStoragePort = Arc<dyn StoragePort>;

#[async_trait]
impl<T: StoragePort + ?Sized> StoragePort for Arc<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn insert_one(
        &self,
        document: Document,
        options: &InsertOptions,
    ) -> StorageResult<InsertOneResult> {
        (**self).insert_one(document, options).await
    }

    async fn find_one(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Option<Document>> {
        (**self).find_one(filter, options).await
    }

    async fn find_many(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Vec<Document>> {
        (**self).find_many(filter, options).await
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: &UpdatePatch,
        options: &UpdateOptions,
    ) -> StorageResult<UpdateResult> {
        (**self).update_one(filter, update, options).await
    }
}
