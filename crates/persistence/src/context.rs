//! Application context.
//!
//! [`AppContext`] is built once at startup and shared by reference. It owns
//! the settings, the connector, the telemetry sink and the store handle. The
//! handle is established on first use; concurrent first callers all await the
//! same in-flight connect, so a process opens at most one connection. A
//! failed connect is not cached and the next caller tries again.
//!
//! # Example
//!
//! ```
//! use patient_tests_persistence::{AppContext, Settings};
//! use patient_tests_persistence::records::{Gender, Patient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = AppContext::in_memory(Settings::for_testing());
//! let patients = context.patient_repository().await?;
//!
//! patients
//!     .insert(Patient::new("p1", Gender::Male, "1990-05-07", "1234"))
//!     .await?;
//! assert!(patients.find_by_id("p1").await?.is_some());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::backends::memory::MemoryConnector;
use crate::config::Settings;
use crate::core::{DocumentStore, DynStoragePort, StoreConnector};
use crate::error::{StorageError, StorageResult};
use crate::repository::{PatientRepository, PatientTestRepository};
use crate::telemetry::{InstrumentedCollection, TelemetrySink, TracingTelemetrySink};

/// Shared application state.
pub struct AppContext<C: StoreConnector> {
    settings: Settings,
    connector: C,
    store: OnceCell<Arc<C::Store>>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl AppContext<MemoryConnector> {
    /// Creates a context over the in-memory store.
    pub fn in_memory(settings: Settings) -> Self {
        Self::new(settings, MemoryConnector)
    }
}

impl<C: StoreConnector> AppContext<C> {
    /// Creates a context reporting telemetry through `tracing`.
    ///
    /// Nothing is connected until a store or repository is first requested.
    pub fn new(settings: Settings, connector: C) -> Self {
        Self {
            settings,
            connector,
            store: OnceCell::new(),
            telemetry: Arc::new(TracingTelemetrySink),
        }
    }

    /// Replaces the telemetry sink.
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    /// The settings this context was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns true once the store handle is established.
    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }

    /// Returns the shared store handle, connecting on first use.
    ///
    /// # Errors
    ///
    /// * Whatever the connector returns; the next call retries
    pub async fn store(&self) -> StorageResult<Arc<C::Store>> {
        self.store
            .get_or_try_init(|| async {
                let store = self.connector.connect(&self.settings).await?;
                info!(
                    backend = store.backend_name(),
                    database = %store.database_name(),
                    "store connected"
                );
                Ok::<_, StorageError>(Arc::new(store))
            })
            .await
            .cloned()
    }

    /// Returns the port for collection `name`, wrapped with the telemetry
    /// decorator when dependency telemetry is enabled.
    pub async fn collection(&self, name: &str) -> StorageResult<DynStoragePort> {
        let store = self.store().await?;
        let port = store.collection(name);

        if !self.settings.enable_dependency_telemetry {
            return Ok(port);
        }

        Ok(Arc::new(InstrumentedCollection::new(
            port,
            self.telemetry.clone(),
            name,
            store.database_name(),
        )))
    }

    /// Repository over the configured patient collection.
    pub async fn patient_repository(&self) -> StorageResult<PatientRepository> {
        let port = self.collection(&self.settings.patient_collection).await?;
        Ok(PatientRepository::new(port))
    }

    /// Repository over the configured patient-test collection.
    pub async fn patient_test_repository(&self) -> StorageResult<PatientTestRepository> {
        let port = self.collection(&self.settings.test_collection).await?;
        Ok(PatientTestRepository::new(port))
    }
}
