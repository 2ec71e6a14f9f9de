//! Core storage traits and abstractions.
//!
//! This module provides the foundational traits for the persistence layer:
//!
//! - [`StoragePort`] - One collection: insert-one, find-one, find-many, update-one
//! - [`DocumentStore`] - An open database handing out collection ports
//! - [`StoreConnector`] - Establishes a [`DocumentStore`] from settings
//!
//! # Layering
//!
//! ```text
//! RecordRepository<E>
//!     └── StoragePort (Arc<dyn StoragePort>)
//!             ├── InstrumentedCollection<P>   (telemetry decorator)
//!             └── MemoryCollection / network driver
//! ```
//!
//! Repositories depend on the port only; they cannot tell a plain port from
//! an instrumented one.

pub mod port;
pub mod store;

pub use port::{
    DynStoragePort, FindOptions, InsertOneResult, InsertOptions, StoragePort, UpdateOptions,
    UpdateResult,
};
pub use store::{DocumentStore, StoreConnector};
