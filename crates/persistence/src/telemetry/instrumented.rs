//! Instrumented storage decorator.
//!
//! [`InstrumentedCollection`] wraps any [`StoragePort`] and is itself a
//! `StoragePort`. Each call is timed on both the success and failure paths,
//! reported once to the sink, and its result (value or error) is handed back
//! untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::core::{
    FindOptions, InsertOneResult, InsertOptions, StoragePort, UpdateOptions, UpdateResult,
};
use crate::error::StorageResult;
use crate::types::{Document, Filter, UpdatePatch};

use super::{DependencyTelemetry, ResultCode, TelemetrySink};

/// Measures one call.
struct Timer {
    started: Instant,
}

impl Timer {
    fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Returns the elapsed time and the wall-clock end time.
    fn stop(self) -> (Duration, DateTime<Utc>) {
        (self.started.elapsed(), Utc::now())
    }
}

/// A storage port that reports every call to a [`TelemetrySink`].
pub struct InstrumentedCollection<P> {
    inner: P,
    sink: Arc<dyn TelemetrySink>,
    collection_name: String,
    database_name: String,
}

impl<P: StoragePort> InstrumentedCollection<P> {
    /// Wraps `inner`, reporting calls against `collection_name` in
    /// `database_name`.
    pub fn new(
        inner: P,
        sink: Arc<dyn TelemetrySink>,
        collection_name: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            sink,
            collection_name: collection_name.into(),
            database_name: database_name.into(),
        }
    }

    /// Returns the wrapped port.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Returns the collection name reported as the telemetry target.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn track_dependency<T, F>(&self, query: Value, call: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        let timer = Timer::start();
        let result = call.await;
        let (duration, time) = timer.stop();

        let (result_code, success) = match &result {
            Ok(_) => (ResultCode::Code(0), true),
            Err(err) => (ResultCode::Error(err.to_string()), false),
        };
        self.sink.track_dependency(DependencyTelemetry {
            name: self.database_name.clone(),
            target: self.collection_name.clone(),
            dependency_type_name: self.inner.backend_name().to_string(),
            data: query.to_string(),
            duration,
            time,
            result_code,
            success,
        });

        result
    }
}

#[async_trait]
impl<P: StoragePort> StoragePort for InstrumentedCollection<P> {
    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    async fn insert_one(
        &self,
        document: Document,
        options: &InsertOptions,
    ) -> StorageResult<InsertOneResult> {
        let query = json!({ "insertOne": { "options": options } });
        self.track_dependency(query, self.inner.insert_one(document, options))
            .await
    }

    async fn find_one(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Option<Document>> {
        let query = json!({
            "findOne": { "fields": filter.field_names(), "options": options }
        });
        self.track_dependency(query, self.inner.find_one(filter, options))
            .await
    }

    async fn find_many(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Vec<Document>> {
        let query = json!({
            "find": { "fields": filter.field_names(), "options": options }
        });
        self.track_dependency(query, self.inner.find_many(filter, options))
            .await
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: &UpdatePatch,
        options: &UpdateOptions,
    ) -> StorageResult<UpdateResult> {
        let query = json!({
            "updateOne": {
                "fields": filter.field_names(),
                "set": update.field_names(),
                "options": options
            }
        });
        self.track_dependency(query, self.inner.update_one(filter, update, options))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::MemoryCollection;
    use crate::telemetry::MemoryTelemetrySink;
    use crate::types::Fragment;

    #[tokio::test]
    async fn test_descriptor_is_structural() {
        let sink = Arc::new(MemoryTelemetrySink::new());
        let collection = InstrumentedCollection::new(
            MemoryCollection::new("patients"),
            sink.clone(),
            "patients",
            "db",
        );

        let mut doc = Document::new();
        doc.insert("_id".to_string(), json!("p1"));
        doc.insert("lastName".to_string(), json!("Secretname"));
        collection
            .insert_one(doc, &InsertOptions::default())
            .await
            .unwrap();

        let filter = Filter::match_all().with(Fragment::eq("lastName", "Secretname"));
        collection
            .find_one(&filter, &FindOptions::default())
            .await
            .unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, r#"{"insertOne":{"options":{}}}"#);
        assert_eq!(
            records[1].data,
            r#"{"findOne":{"fields":["lastName"],"options":{}}}"#
        );
        assert!(records.iter().all(|r| !r.data.contains("Secretname")));
        assert!(records.iter().all(|r| r.success));
        assert_eq!(records[0].target, "patients");
        assert_eq!(records[0].name, "db");
        assert_eq!(records[0].dependency_type_name, "memory");
        assert_eq!(records[0].result_code, ResultCode::Code(0));
    }
}
