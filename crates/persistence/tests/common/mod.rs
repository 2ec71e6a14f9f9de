//! Test infrastructure for the persistence layer.
//!
//! This module provides record fixtures, scripted storage ports, and
//! assertion helpers shared by the integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod ports;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use ports::*;
