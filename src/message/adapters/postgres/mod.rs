//! `PostgreSQL` adapter for message persistence.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::PostgresMessageRepository;
