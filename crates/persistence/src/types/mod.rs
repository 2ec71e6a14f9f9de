//! Core types for documents, filters and search criteria.
//!
//! - [`Document`] - A stored document as a JSON object
//! - [`Filter`] / [`Fragment`] - Store-agnostic filter expressions
//! - [`UpdatePatch`] - Field-level (`$set`) updates
//! - [`SearchCriteria`] - Partial search requests

mod criteria;
mod filter;

pub use criteria::{CriterionValue, SearchCriteria};
pub use filter::{Filter, Fragment, RangeBound, RangeValue, UpdatePatch};

/// A document as handed to and returned by a store.
pub type Document = serde_json::Map<String, serde_json::Value>;
