//! Membership lifecycle
//!
//! A member links a user to an organization with no role payload beyond
//! being a member. Roles and permissions live in the organization's
//! authorization policy data.
//!
//! ```text
//!            invite            confirm
//!   (none) ─────────→ Invited ─────────→ Confirmed
//!                        │                   │
//!                        └──── remove ───────┴──→ Removed (row deleted)
//! ```
//!
//! The store enforces the lifecycle. The manager uses these types to name
//! the transition each operation requests.

use serde::{Deserialize, Serialize};

/// State of a user's membership in an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    /// Invitation sent, not yet accepted
    Invited,
    /// Invitation accepted
    Confirmed,
    /// Membership deleted, either by leaving or by removal
    Removed,
}

/// A request to move a membership to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipEvent {
    Invite,
    Confirm,
    Remove,
}

impl MembershipState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipState::Invited => "invited",
            MembershipState::Confirmed => "confirmed",
            MembershipState::Removed => "removed",
        }
    }
}

impl std::fmt::Display for MembershipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MembershipEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipEvent::Invite => "invite",
            MembershipEvent::Confirm => "confirm",
            MembershipEvent::Remove => "remove",
        }
    }

    /// State the membership is in after the event succeeds.
    pub fn target_state(&self) -> MembershipState {
        match self {
            MembershipEvent::Invite => MembershipState::Invited,
            MembershipEvent::Confirm => MembershipState::Confirmed,
            MembershipEvent::Remove => MembershipState::Removed,
        }
    }
}

impl std::fmt::Display for MembershipEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
