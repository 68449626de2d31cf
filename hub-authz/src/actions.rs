//! # Actions
//!
//! Defines the privileged actions that can be performed within an organization.
//! Every privileged organization operation names exactly one of these when it
//! asks the authorizer for a decision, and custom policies list them in their
//! `allowed_actions` rule.

use serde::{Deserialize, Serialize};

/// Actions that can be authorized within an organization.
///
/// The serialized form is the camelCase identifier used by policy documents
/// and by the authorizer input (e.g. `addOrganizationMember`). The special
/// [`Action::All`] value is used by policies to grant every action at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Wildcard granting every action.
    All,

    /// Invite a user to join the organization.
    AddOrganizationMember,

    /// Add a repository to the organization.
    AddOrganizationRepository,

    /// Delete the organization.
    DeleteOrganization,

    /// Remove a member other than yourself from the organization.
    DeleteOrganizationMember,

    /// Delete a repository owned by the organization.
    DeleteOrganizationRepository,

    /// Read the organization's authorization policy.
    GetAuthorizationPolicy,

    /// Transfer a repository into or out of the organization.
    TransferOrganizationRepository,

    /// Replace the organization's authorization policy.
    UpdateAuthorizationPolicy,

    /// Update the organization's profile.
    UpdateOrganization,

    /// Update a repository owned by the organization.
    UpdateOrganizationRepository,
}

impl Action {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// The camelCase identifier used in policy documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::All => "all",
            Action::AddOrganizationMember => "addOrganizationMember",
            Action::AddOrganizationRepository => "addOrganizationRepository",
            Action::DeleteOrganization => "deleteOrganization",
            Action::DeleteOrganizationMember => "deleteOrganizationMember",
            Action::DeleteOrganizationRepository => "deleteOrganizationRepository",
            Action::GetAuthorizationPolicy => "getAuthorizationPolicy",
            Action::TransferOrganizationRepository => "transferOrganizationRepository",
            Action::UpdateAuthorizationPolicy => "updateAuthorizationPolicy",
            Action::UpdateOrganization => "updateOrganization",
            Action::UpdateOrganizationRepository => "updateOrganizationRepository",
        }
    }

    /// Parse an action from its policy identifier.
    ///
    /// Matching is exact: policy documents are case-sensitive, so
    /// `AddOrganizationMember` is not accepted.
    ///
    /// # Example
    ///
    /// ```
    /// use hub_authz::actions::Action;
    ///
    /// assert_eq!(Action::parse("addOrganizationMember"), Some(Action::AddOrganizationMember));
    /// assert_eq!(Action::parse("all"), Some(Action::All));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|action| action.as_str() == s)
    }

    /// Get all actions, including the [`Action::All`] wildcard.
    pub fn all() -> Vec<Self> {
        vec![
            Action::All,
            Action::AddOrganizationMember,
            Action::AddOrganizationRepository,
            Action::DeleteOrganization,
            Action::DeleteOrganizationMember,
            Action::DeleteOrganizationRepository,
            Action::GetAuthorizationPolicy,
            Action::TransferOrganizationRepository,
            Action::UpdateAuthorizationPolicy,
            Action::UpdateOrganization,
            Action::UpdateOrganizationRepository,
        ]
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
