//! A single in-memory collection.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::core::{
    FindOptions, InsertOneResult, InsertOptions, StoragePort, UpdateOptions, UpdateResult,
};
use crate::error::{BackendError, StorageResult};
use crate::types::{Document, Filter, Fragment, UpdatePatch};

use super::matcher::{matches, project};

const BACKEND_NAME: &str = "memory";

/// Documents of one collection, kept in insertion order.
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
    closed: Arc<AtomicBool>,
}

impl Debug for MemoryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCollection")
            .field("name", &self.name)
            .field("len", &self.documents.read().len())
            .finish_non_exhaustive()
    }
}

impl MemoryCollection {
    /// Creates an empty, standalone collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_shutdown(name, Arc::new(AtomicBool::new(false)))
    }

    /// Creates an empty collection that fails every call once `closed` is set.
    pub(crate) fn with_shutdown(name: impl Into<String>, closed: Arc<AtomicBool>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
            closed,
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Returns a copy of every stored document, in insertion order.
    pub fn documents(&self) -> Vec<Document> {
        self.documents.read().clone()
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackendError::Unavailable {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("store closed; collection '{}' is unreachable", self.name),
            }
            .into());
        }
        Ok(())
    }

    fn output(document: &Document, options: &FindOptions) -> Document {
        match &options.projection {
            Some(fields) => project(document, fields),
            None => document.clone(),
        }
    }

    /// Builds the document an upsert inserts: the filter's equality values
    /// overlaid with the patch.
    fn upsert_document(filter: &Filter, update: &UpdatePatch) -> Document {
        let mut document = Document::new();
        for fragment in filter.fragments() {
            if let Fragment::Eq { field, value } = fragment {
                if !value.is_null() {
                    document.insert(field.clone(), value.clone());
                }
            }
        }
        for (field, value) in update.fields() {
            document.insert(field.clone(), value.clone());
        }
        document
    }
}

#[async_trait]
impl StoragePort for MemoryCollection {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn insert_one(
        &self,
        document: Document,
        _options: &InsertOptions,
    ) -> StorageResult<InsertOneResult> {
        self.ensure_open()?;

        let Some(id) = document.get("_id").filter(|id| !id.is_null()).cloned() else {
            return Err(BackendError::QueryError {
                message: format!("document for '{}' has no _id", self.name),
            }
            .into());
        };

        let mut documents = self.documents.write();
        if documents.iter().any(|existing| existing.get("_id") == Some(&id)) {
            debug!(collection = %self.name, id = %id, "duplicate _id, nothing inserted");
            return Ok(InsertOneResult {
                inserted_count: 0,
                inserted_id: None,
            });
        }
        documents.push(document);

        Ok(InsertOneResult {
            inserted_count: 1,
            inserted_id: Some(id),
        })
    }

    async fn find_one(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Option<Document>> {
        self.ensure_open()?;

        let documents = self.documents.read();
        Ok(documents
            .iter()
            .find(|document| matches(document, filter))
            .map(|document| Self::output(document, options)))
    }

    async fn find_many(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Vec<Document>> {
        self.ensure_open()?;

        let documents = self.documents.read();
        Ok(documents
            .iter()
            .filter(|document| matches(document, filter))
            .map(|document| Self::output(document, options))
            .collect())
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: &UpdatePatch,
        options: &UpdateOptions,
    ) -> StorageResult<UpdateResult> {
        self.ensure_open()?;

        let mut documents = self.documents.write();
        let Some(index) = documents
            .iter()
            .position(|document| matches(document, filter))
        else {
            if !options.upsert {
                return Ok(UpdateResult::default());
            }

            let document = Self::upsert_document(filter, update);
            let Some(id) = document.get("_id").cloned() else {
                return Err(BackendError::QueryError {
                    message: "upsert filter must pin _id".to_string(),
                }
                .into());
            };
            if documents.iter().any(|existing| existing.get("_id") == Some(&id)) {
                return Err(BackendError::QueryError {
                    message: format!("upsert would duplicate _id {}", id),
                }
                .into());
            }
            documents.push(document);
            return Ok(UpdateResult {
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(id),
            });
        };

        let document = &mut documents[index];
        let mut changed = false;
        for (field, value) in update.fields() {
            if document.get(field) != Some(value) {
                document.insert(field.clone(), value.clone());
                changed = true;
            }
        }

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(changed),
            upserted_id: None,
        })
    }
}
