//! Task and subtask engine.
//!
//! Tasks are managed by the project creator and executed by participants.
//! Completion state flows bottom-up: a task with subtasks cannot be
//! completed directly while any subtask is open, and every subtask-set
//! mutation recomputes the parent's status. The module follows hexagonal
//! architecture:
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
