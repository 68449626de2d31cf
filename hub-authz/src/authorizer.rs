//! # Authorizer
//!
//! The gateway every privileged organization operation goes through before it
//! is allowed to touch storage. The evaluation itself (compiling the policy,
//! resolving roles from the policy data) lives behind the [`Authorizer`]
//! trait; callers only see "permitted" or an [`AuthzError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::actions::Action;

/// Authorization error types.
///
/// Callers surface these unchanged: the authorizer owns the distinction
/// between a denial and a failure to reach a decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// The policy denied the action.
    #[error("insufficient privilege")]
    InsufficientPrivilege,

    /// The organization's policy could not be evaluated.
    #[error("policy evaluation failed: {0}")]
    Evaluation(String),

    /// The authorizer backend could not be reached.
    #[error("authorizer unavailable: {0}")]
    Unavailable(String),
}

/// Result type for authorization checks.
pub type AuthzResult<T> = Result<T, AuthzError>;

impl AuthzError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthzError::InsufficientPrivilege => 403,
            AuthzError::Evaluation(_) | AuthzError::Unavailable(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthzError::InsufficientPrivilege => "INSUFFICIENT_PRIVILEGE",
            AuthzError::Evaluation(_) => "POLICY_EVALUATION_FAILED",
            AuthzError::Unavailable(_) => "AUTHORIZER_UNAVAILABLE",
        }
    }
}

/// Input for a single authorization decision.
///
/// Built fresh for every check and never persisted.
///
/// # Example
///
/// ```
/// use hub_authz::{Action, AuthorizeInput};
/// use uuid::Uuid;
///
/// let input = AuthorizeInput::new("org1", Uuid::now_v7(), Action::UpdateOrganization);
/// assert_eq!(input.organization_name, "org1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeInput {
    /// Organization the action targets
    pub organization_name: String,

    /// User attempting the action
    pub user_id: Uuid,

    /// Action being attempted
    pub action: Action,
}

impl AuthorizeInput {
    /// Create a new authorization input.
    pub fn new(organization_name: impl Into<String>, user_id: Uuid, action: Action) -> Self {
        Self {
            organization_name: organization_name.into(),
            user_id,
            action,
        }
    }
}

/// Authorization gateway.
///
/// `Ok(())` means the user may perform the action in the organization.
/// Implementations must return promptly when their future is dropped.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Decide whether `input.user_id` may perform `input.action` in
    /// `input.organization_name`.
    async fn authorize(&self, input: &AuthorizeInput) -> AuthzResult<()>;
}
