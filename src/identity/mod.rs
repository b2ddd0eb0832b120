//! User accounts consumed as opaque actor references.
//!
//! Authentication, password handling, and profile rendering live outside
//! this crate; the engines only need stable user identifiers and a directory
//! for resolving usernames (invitations are addressed by username). The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
