//! Scripted storage ports.
//!
//! [`ScriptedPort`] answers every call with fixed write counts (or a fixed
//! failure) and records what it was asked, so tests can check both the
//! repository's reaction to store outcomes and the exact calls it made.

use async_trait::async_trait;
use parking_lot::Mutex;

use patient_tests_persistence::core::{
    FindOptions, InsertOneResult, InsertOptions, StoragePort, UpdateOptions, UpdateResult,
};
use patient_tests_persistence::error::{BackendError, StorageError, StorageResult};
use patient_tests_persistence::types::{Document, Filter, UpdatePatch};

/// One call received by a [`ScriptedPort`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Insert(Document),
    FindOne(Filter),
    FindMany(Filter),
    Update(Filter, UpdatePatch),
}

/// A port with canned answers.
pub struct ScriptedPort {
    inserted_count: u64,
    modified_count: u64,
    documents: Vec<Document>,
    failure: Option<fn() -> StorageError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedPort {
    /// Reports one document inserted or modified per write and finds nothing.
    pub fn succeeding() -> Self {
        Self {
            inserted_count: 1,
            modified_count: 1,
            documents: Vec::new(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reports zero inserted and zero modified documents.
    pub fn zero_counts() -> Self {
        Self {
            inserted_count: 0,
            modified_count: 0,
            ..Self::succeeding()
        }
    }

    /// Fails every call with the error `failure` builds.
    pub fn failing(failure: fn() -> StorageError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::succeeding()
        }
    }

    /// Returns `documents` from every find.
    pub fn returning(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::succeeding()
        }
    }

    /// The calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: RecordedCall) -> StorageResult<()> {
        self.calls.lock().push(call);
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

/// The transport failure used by failing ports.
pub fn connection_reset() -> StorageError {
    StorageError::Backend(BackendError::Unavailable {
        backend_name: "scripted".to_string(),
        message: "connection reset by peer".to_string(),
    })
}

#[async_trait]
impl StoragePort for ScriptedPort {
    fn backend_name(&self) -> &'static str {
        "scripted"
    }

    async fn insert_one(
        &self,
        document: Document,
        _options: &InsertOptions,
    ) -> StorageResult<InsertOneResult> {
        let id = document.get("_id").cloned();
        self.record(RecordedCall::Insert(document))?;
        Ok(InsertOneResult {
            inserted_count: self.inserted_count,
            inserted_id: id.filter(|_| self.inserted_count > 0),
        })
    }

    async fn find_one(
        &self,
        filter: &Filter,
        _options: &FindOptions,
    ) -> StorageResult<Option<Document>> {
        self.record(RecordedCall::FindOne(filter.clone()))?;
        Ok(self.documents.first().cloned())
    }

    async fn find_many(
        &self,
        filter: &Filter,
        _options: &FindOptions,
    ) -> StorageResult<Vec<Document>> {
        self.record(RecordedCall::FindMany(filter.clone()))?;
        Ok(self.documents.clone())
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: &UpdatePatch,
        _options: &UpdateOptions,
    ) -> StorageResult<UpdateResult> {
        self.record(RecordedCall::Update(filter.clone(), update.clone()))?;
        Ok(UpdateResult {
            matched_count: self.modified_count,
            modified_count: self.modified_count,
            upserted_id: None,
        })
    }
}
