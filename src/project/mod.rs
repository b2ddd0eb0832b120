//! Project aggregate and lifecycle management.
//!
//! A project is owned by exactly one creator, carries an optional deadline,
//! and aggregates tasks, participants, applications, invitations, and
//! messages. Deleting a project cascades to every dependent in a single
//! transaction. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
