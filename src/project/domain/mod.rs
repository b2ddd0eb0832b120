//! Domain model for projects.

mod error;
mod ids;
mod project;

pub use error::{ParseDeadlineError, ProjectDomainError};
pub use ids::ProjectId;
pub use project::{Deadline, PersistedProjectData, Project, ProjectTitle};
