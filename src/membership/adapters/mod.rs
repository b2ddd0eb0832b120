//! Adapter implementations of the membership ports.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMembershipRepository;
pub use postgres::PostgresMembershipRepository;
