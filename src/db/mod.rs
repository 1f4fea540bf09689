//! Database access layer.
//!
//! This module provides:
//! - Dialect-specific connection pools with configured limits
//! - The named connection registry with its `"default"` alias
//! - Value binding and statement execution over any supported pool

pub mod bind;
pub mod exec;
pub mod pool;
pub mod registry;

pub use exec::execute;
pub use pool::DbPool;
pub use registry::{DEFAULT_NAME, Database, Registry};
