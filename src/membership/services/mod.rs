//! Application services for membership recruitment.

mod enrollment;

pub use enrollment::{
    AcceptedApplication, AcceptedInvitation, ApplyOutcome, MembershipService,
    MembershipServiceError, MembershipServiceResult,
};
