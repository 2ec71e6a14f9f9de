//! Patient Tests API Persistence Layer
//!
//! This crate stores patient records and their lab tests in a document store,
//! builds store filters from partial search requests, and reports every
//! storage call to a telemetry sink.
//!
//! # Features
//!
//! - **Typed records**: domain records and their stored form are distinct
//!   types, with a total mapping in both directions
//! - **Criteria builder**: absent fields place no constraint, date ranges widen
//!   to whole calendar days or use exact bounds, as dates or epoch millis
//! - **Write outcomes**: zero inserted or modified documents become errors
//! - **Dependency telemetry**: a decorator times each call without changing it
//! - **Shared connection**: established once, on first use, for the process
//!
//! # Architecture
//!
//! - [`core`] - Storage port, store handle and connector traits
//! - [`types`] - Documents, filters, patches and search criteria
//! - [`search`] - Criteria to filter construction
//! - [`records`] - Patient and patient-test records
//! - [`repository`] - Insert, find, update and search per entity
//! - [`telemetry`] - Telemetry records, sinks and the instrumented decorator
//! - [`backends`] - Store implementations
//! - [`context`] - Application context owning the shared store handle
//! - [`config`] - Settings
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use patient_tests_persistence::{AppContext, Settings};
//! use patient_tests_persistence::records::{Gender, Patient, PatientSearch};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = AppContext::in_memory(Settings::for_testing());
//! let patients = context.patient_repository().await?;
//!
//! let doe = Patient::new("p1", Gender::Male, "1990-05-07", "1234").with_last_name("Doe");
//! patients.insert(doe.clone()).await?;
//!
//! assert_eq!(patients.find_by_id("p1").await?, Some(doe));
//!
//! let search = PatientSearch {
//!     gender: Some(Gender::Female),
//!     ..Default::default()
//! };
//! assert!(patients.search(&search).await?.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod logging;
pub mod records;
pub mod repository;
pub mod search;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Settings;
pub use context::AppContext;
pub use error::{StorageError, StorageResult};
pub use logging::init_logging;
pub use types::{Document, Filter, SearchCriteria};

// Re-export core traits
pub use core::{DocumentStore, StoragePort, StoreConnector};

pub use records::{Entity, Patient, PatientTest};
pub use repository::{PatientRepository, PatientTestRepository, RecordRepository};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
