//! Shared request status for applications and invitations.

use super::ParseMembershipStatusError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a membership request.
///
/// Both request flows share the same machine: a record starts `Pending` and
/// resolves to `Accepted` or `Rejected`. Resolved records never transition
/// again; a rejected applicant opens a fresh record instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; a participant record was created alongside.
    Accepted,
    /// Declined.
    Rejected,
}

impl MembershipStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true when a decision is still outstanding.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl TryFrom<&str> for MembershipStatus {
    type Error = ParseMembershipStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseMembershipStatusError(value.to_owned())),
        }
    }
}
