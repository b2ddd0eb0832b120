//! Port contracts for membership recruitment.

pub mod repository;

pub use repository::{
    MembershipRepository, MembershipRepositoryError, MembershipRepositoryResult,
    ParticipantRemoval,
};
