//! Adapter implementations of the message ports.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMessageRepository;
pub use postgres::PostgresMessageRepository;
