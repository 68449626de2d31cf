//! # Hub Email
//!
//! Outgoing email for hub services: the message type, the transport trait the
//! organization manager notifies through, and an HTTP transport for
//! transactional email APIs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hub_email::{Email, EmailConfig, EmailSender, HttpEmailSender};
//!
//! async fn invite() -> Result<(), hub_email::EmailError> {
//!     let sender = HttpEmailSender::new(EmailConfig::from_env())?;
//!     let email = Email::new("user@example.com", "Welcome", "<p>Hello</p>");
//!     sender.send_email(&email).await
//! }
//! ```

pub mod config;
pub mod http;
pub mod message;

// Re-export main types
pub use config::{ConfigError, EmailConfig};
pub use http::HttpEmailSender;
pub use message::{Email, EmailError, EmailResult, EmailSender};

/// URL type used for email links and API endpoints.
pub use reqwest::Url;
