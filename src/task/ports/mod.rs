//! Port contracts for the task engine.

pub mod repository;

pub use repository::{
    SubTaskChange, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
