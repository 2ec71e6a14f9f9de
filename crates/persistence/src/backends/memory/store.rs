//! In-memory database handle and its connector.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use crate::config::Settings;
use crate::core::{DocumentStore, DynStoragePort, StoreConnector};
use crate::error::{BackendError, StorageResult};

use super::collection::MemoryCollection;

/// Connection strings the memory connector accepts start with this scheme.
pub const MEMORY_SCHEME: &str = "memory://";

/// One in-memory database: a set of named collections.
pub struct MemoryStore {
    database: String,
    collections: RwLock<HashMap<String, Arc<MemoryCollection>>>,
    closed: Arc<AtomicBool>,
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("database", &self.database)
            .field("collections", &self.collections.read().len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl MemoryStore {
    /// Creates an empty database named `database`.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: RwLock::new(HashMap::new()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the concrete collection `name`, creating it on first use.
    pub fn memory_collection(&self, name: &str) -> Arc<MemoryCollection> {
        if let Some(collection) = self.collections.read().get(name) {
            return collection.clone();
        }

        self.collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(MemoryCollection::with_shutdown(name, self.closed.clone()))
            })
            .clone()
    }

    /// Names of the collections created so far.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Makes every collection of this store fail with `Unavailable`, the way
    /// a dropped server connection would.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        info!(database = %self.database, "memory store closed");
    }

    /// Returns true once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    fn collection(&self, name: &str) -> DynStoragePort {
        self.memory_collection(name)
    }
}

/// Opens [`MemoryStore`]s for `memory://` connection strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryConnector;

#[async_trait]
impl StoreConnector for MemoryConnector {
    type Store = MemoryStore;

    async fn connect(&self, settings: &Settings) -> StorageResult<MemoryStore> {
        if !settings.connection_string.starts_with(MEMORY_SCHEME) {
            return Err(BackendError::ConnectionFailed {
                backend_name: "memory".to_string(),
                message: format!(
                    "unsupported connection string scheme; expected {}",
                    MEMORY_SCHEME
                ),
            }
            .into());
        }

        info!(
            database = %settings.database,
            allow_self_signed_cert = settings.allow_self_signed_cert,
            "opened in-memory store"
        );
        Ok(MemoryStore::new(settings.database.clone()))
    }
}
