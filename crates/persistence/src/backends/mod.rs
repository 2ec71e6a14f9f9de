//! Storage backend implementations.
//!
//! # Available Backends
//!
//! | Backend | Connection string | Description |
//! |---------|-------------------|-------------|
//! | Memory | `memory://` | Process-local document store for development and tests |

pub mod memory;
