//! Store adapters that live inside the domain crate.
//!
//! The in-memory store is the only backend: records are process-local and
//! lost on shutdown.

pub mod memory_repo;
