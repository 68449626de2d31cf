//! Error types for organization operations
//!
//! Collaborator errors convert into [`OrgError`] with `From`, so manager code
//! propagates them with `?`. Storage errors are the one place a conversion
//! reclassifies: the store's privilege rejection becomes
//! [`OrgError::InsufficientPrivilege`], everything else is kept as is.

use hub_authz::AuthzError;
use hub_email::EmailError;
use thiserror::Error;

use crate::db::DbError;
use crate::validation::ValidationError;

/// Organization operation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrgError {
    /// Input failed validation; nothing was sent to the authorizer or store
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The authorizer denied the action or failed to decide
    #[error(transparent)]
    Authorization(#[from] AuthzError),

    /// The store's own access control rejected the operation
    ///
    /// Denials from the authorizer arrive as
    /// `Authorization(AuthzError::InsufficientPrivilege)` instead; use
    /// [`OrgError::is_insufficient_privilege`] to match either.
    #[error("insufficient privilege")]
    InsufficientPrivilege,

    /// Storage failure
    #[error(transparent)]
    Database(DbError),

    /// The invitation email could not be sent; the membership was recorded
    #[error(transparent)]
    Notification(#[from] EmailError),

    /// An external call did not complete in time
    #[error("{0} timed out")]
    Timeout(&'static str),
}

/// Result type for organization operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl From<DbError> for OrgError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InsufficientPrivilege => OrgError::InsufficientPrivilege,
            other => OrgError::Database(other),
        }
    }
}

impl OrgError {
    /// Check if the error was caused by the caller's input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, OrgError::InvalidInput(_))
    }

    /// Check if the caller lacks the privilege for the operation, whether
    /// the authorizer or the store said so.
    pub fn is_insufficient_privilege(&self) -> bool {
        matches!(
            self,
            OrgError::InsufficientPrivilege
                | OrgError::Authorization(AuthzError::InsufficientPrivilege)
        )
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OrgError::InvalidInput(_) => 400,
            OrgError::Authorization(e) => e.status_code(),
            OrgError::InsufficientPrivilege => 403,
            OrgError::Database(_) | OrgError::Notification(_) => 500,
            OrgError::Timeout(_) => 504,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::InvalidInput(_) => "INVALID_INPUT",
            OrgError::Authorization(e) => e.error_code(),
            OrgError::InsufficientPrivilege => "INSUFFICIENT_PRIVILEGE",
            OrgError::Database(_) => "DATABASE_ERROR",
            OrgError::Notification(_) => "NOTIFICATION_FAILED",
            OrgError::Timeout(_) => "TIMEOUT",
        }
    }
}
