//! `PostgreSQL` adapter for project persistence.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::PostgresProjectRepository;
