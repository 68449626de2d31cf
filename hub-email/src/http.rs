//! HTTP email sender.
//!
//! Delivers email through a transactional email API that accepts a JSON
//! message at `POST /v1/send` and authenticates with a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::config::EmailConfig;
use crate::message::{Email, EmailError, EmailResult, EmailSender};

/// Email sender backed by a transactional email HTTP API.
#[derive(Clone)]
pub struct HttpEmailSender {
    /// HTTP client instance.
    client: Client,

    /// API configuration.
    config: EmailConfig,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: Address<'a>,
    to: [Address<'a>; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpEmailSender {
    /// Create a new sender.
    pub fn new(config: EmailConfig) -> EmailResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    /// API configuration in use.
    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    async fn handle_response(&self, response: reqwest::Response) -> EmailResult<()> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            error!("Email API authentication failed");
            return Err(EmailError::AuthenticationFailed);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Email API error ({}): {}", status.as_u16(), message);
            return Err(EmailError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    #[instrument(skip(self, email), fields(subject = %email.subject))]
    async fn send_email(&self, email: &Email) -> EmailResult<()> {
        if !email.has_valid_recipient() {
            return Err(EmailError::InvalidRecipient(email.to.clone()));
        }

        let payload = SendRequest {
            from: Address {
                email: &self.config.from_address,
                name: Some(&self.config.from_name),
            },
            to: [Address {
                email: &email.to,
                name: None,
            }],
            subject: &email.subject,
            html: &email.body,
        };

        let url = self.config.url("/v1/send");
        let mut request = self.client.post(&url).json(&payload);

        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;
        self.handle_response(response).await?;

        debug!("Email delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = SendRequest {
            from: Address {
                email: "hub@localhost",
                name: Some("Hub"),
            },
            to: [Address {
                email: "user@example.com",
                name: None,
            }],
            subject: "Hello",
            html: "<p>Hi</p>",
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["from"]["name"], "Hub");
        assert_eq!(json["to"][0]["email"], "user@example.com");
        assert!(json["to"][0].get("name").is_none());
        assert_eq!(json["html"], "<p>Hi</p>");
    }

    #[test]
    fn test_sender_creation() {
        let sender = HttpEmailSender::new(EmailConfig::default()).unwrap();
        assert_eq!(sender.config().timeout_secs, 10);
    }
}
