//! Shared storage facilities backing the adapters.
//!
//! The in-memory database lives here rather than inside any single bounded
//! context because several operations span tables owned by different
//! contexts: membership removal resets task assignments, and project
//! deletion cascades across every dependent table. Sharing one state behind
//! one lock is what lets the memory adapters honour those transaction
//! boundaries.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDb;
pub use postgres::{PgPool, PoolInitError, build_pool};
