//! In-memory document store.
//!
//! Evaluates the same filters and `$set` patches a document database would,
//! including its write counts: a duplicate `_id` inserts nothing and a patch
//! that changes nothing modifies nothing. Used for local runs and tests.
//!
//! # Example
//!
//! ```
//! use patient_tests_persistence::backends::memory::MemoryStore;
//! use patient_tests_persistence::core::{DocumentStore, StoragePort};
//!
//! let store = MemoryStore::new("patient_test");
//! let patients = store.collection("patients");
//! assert_eq!(patients.backend_name(), "memory");
//! ```

mod collection;
mod matcher;
mod store;

pub use collection::MemoryCollection;
pub use matcher::{matches, project};
pub use store::{MEMORY_SCHEME, MemoryConnector, MemoryStore};
