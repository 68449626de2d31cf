//! Email messages and the sender abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Email delivery errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response.
    #[error("Email API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Authentication with the email API failed.
    #[error("Email API authentication failed")]
    AuthenticationFailed,

    /// The recipient address cannot receive email.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        EmailError::RequestFailed(err.to_string())
    }
}

/// Result type for email delivery.
pub type EmailResult<T> = Result<T, EmailError>;

/// A single outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// HTML body.
    pub body: String,
}

impl Email {
    /// Create a new email.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Check that the recipient looks like a deliverable address.
    pub fn has_valid_recipient(&self) -> bool {
        match self.to.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        }
    }
}

/// Email transport.
///
/// One call, one delivery attempt: implementations do not retry.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver `email`.
    async fn send_email(&self, email: &Email) -> EmailResult<()>;
}
