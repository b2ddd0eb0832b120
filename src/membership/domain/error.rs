//! Error types for membership domain validation and parsing.

use super::MembershipStatus;
use crate::failure::{Classify, FailureKind};
use thiserror::Error;

/// Errors returned while mutating membership domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MembershipDomainError {
    /// The request was already resolved and cannot transition again.
    #[error("cannot move a {} membership request to {}", .from.as_str(), .to.as_str())]
    AlreadyResolved {
        /// Status the record currently holds.
        from: MembershipStatus,
        /// Status the transition attempted.
        to: MembershipStatus,
    },
}

impl Classify for MembershipDomainError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::AlreadyResolved { .. } => FailureKind::Conflict,
        }
    }
}

/// Error returned while parsing membership statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership status: {0}")]
pub struct ParseMembershipStatusError(pub String);
