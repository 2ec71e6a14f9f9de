//! Store handles and connectors.
//!
//! A [`DocumentStore`] is an established connection to one database that
//! hands out collection ports by name. A [`StoreConnector`] knows how to
//! establish one from [`Settings`]; the application context calls it at most
//! once per process.

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::StorageResult;

use super::port::DynStoragePort;

/// An open connection to one database.
pub trait DocumentStore: Send + Sync + 'static {
    /// Returns a short name for the backing store (e.g. "memory").
    fn backend_name(&self) -> &'static str;

    /// Name of the database this handle is bound to.
    fn database_name(&self) -> &str;

    /// Returns the port for a collection, creating it on first use.
    fn collection(&self, name: &str) -> DynStoragePort;
}

/// Establishes a [`DocumentStore`].
#[async_trait]
pub trait StoreConnector: Send + Sync + 'static {
    /// The store this connector produces.
    type Store: DocumentStore;

    /// Opens a connection using the connection string, database name and
    /// TLS settings in `settings`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend(ConnectionFailed)` - If the store cannot be reached
    async fn connect(&self, settings: &Settings) -> StorageResult<Self::Store>;
}
