//! Membership recruitment and the participant set.
//!
//! Entry into a project's participant set converges from two symmetric
//! request flows: applicant-initiated applications and creator-initiated
//! invitations. Acceptance of either inserts a participant atomically with
//! the status change; removing a participant unassigns the user's tasks in
//! the same transaction. The module follows hexagonal architecture:
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
