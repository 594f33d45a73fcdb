// # Pushover Notifier
//
// Sends cfddns change notifications through the Pushover message API.
//
// ## Security Requirements
//
// - Application and recipient tokens NEVER appear in logs or Debug output
//
// ## API Reference
//
// - Pushover API: https://pushover.net/api
// - Send Message: POST `/1/messages.json`

use cfddns_core::traits::{Notification, Notifier};
use cfddns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pushover API base URL
pub const PUSHOVER_API_BASE: &str = "https://api.pushover.net";

/// Default HTTP timeout for message submission (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    token: &'a str,
    user: &'a str,
    title: &'a str,
    message: &'a str,
    priority: i8,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    status: i32,
    #[serde(default)]
    errors: Vec<String>,
}

/// Pushover notification backend
pub struct PushoverNotifier {
    /// Application API token
    /// ⚠️ NEVER log this value
    app_token: String,

    /// User or group key
    recipient: String,

    base_url: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the tokens
impl std::fmt::Debug for PushoverNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverNotifier")
            .field("app_token", &"<REDACTED>")
            .field("recipient", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl PushoverNotifier {
    /// Create a notifier against the public Pushover API
    pub fn new(app_token: impl Into<String>, recipient: impl Into<String>) -> Result<Self> {
        Self::with_base_url(app_token, recipient, PUSHOVER_API_BASE)
    }

    /// Create a notifier against an alternative API root
    pub fn with_base_url(
        app_token: impl Into<String>,
        recipient: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let app_token = app_token.into();
        let recipient = recipient.into();
        if app_token.is_empty() || recipient.is_empty() {
            return Err(Error::config(
                "Pushover application token and recipient are required",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            app_token,
            recipient,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let request = MessageRequest {
            token: &self.app_token,
            user: &self.recipient,
            title: &notification.title,
            message: &notification.body,
            priority: notification.priority,
        };

        let response = self
            .client
            .post(format!("{}/1/messages.json", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::notification(format!("Pushover request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::notification(format!("Failed to read Pushover response: {}", e)))?;

        // Pushover reports rejected messages with a 4xx and `status: 0`
        let parsed: Option<MessageResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(reply) if status.is_success() && reply.status == 1 => {
                tracing::debug!("Pushover accepted notification: {}", notification.title);
                Ok(())
            }
            Some(reply) if !reply.errors.is_empty() => Err(Error::notification(format!(
                "Pushover rejected message ({}): {}",
                status,
                reply.errors.join("; ")
            ))),
            _ => Err(Error::notification(format!(
                "Pushover returned HTTP {}",
                status
            ))),
        }
    }

    fn notifier_name(&self) -> &'static str {
        "pushover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification() -> Notification {
        Notification::new(
            "Updating DNS record: home.example.com",
            "Content change: 1.2.3.4 -> 5.6.7.8\nTime: 2024-06-01 12:00:00 UTC",
        )
    }

    #[test]
    fn test_empty_tokens_are_rejected() {
        assert!(PushoverNotifier::new("", "user").is_err());
        assert!(PushoverNotifier::new("app", "").is_err());
    }

    #[test]
    fn test_tokens_not_exposed_in_debug() {
        let notifier = PushoverNotifier::new("app_secret_1", "user_secret_2").unwrap();
        let debug_str = format!("{:?}", notifier);
        assert!(!debug_str.contains("app_secret_1"));
        assert!(!debug_str.contains("user_secret_2"));
    }

    #[tokio::test]
    async fn test_send_posts_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/messages.json"))
            .and(body_json(json!({
                "token": "app",
                "user": "user",
                "title": "Updating DNS record: home.example.com",
                "message": "Content change: 1.2.3.4 -> 5.6.7.8\nTime: 2024-06-01 12:00:00 UTC",
                "priority": 0
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": 1, "request": "abc"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let notifier = PushoverNotifier::with_base_url("app", "user", server.uri()).unwrap();
        notifier.send(&notification()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_message_is_notification_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": 0,
                "errors": ["application token is invalid"]
            })))
            .mount(&server)
            .await;

        let notifier = PushoverNotifier::with_base_url("bad", "user", server.uri()).unwrap();
        let err = notifier.send(&notification()).await.unwrap_err();
        assert!(matches!(err, Error::Notification(_)));
        assert!(err.to_string().contains("application token is invalid"));
    }

    #[tokio::test]
    async fn test_server_error_is_notification_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let notifier = PushoverNotifier::with_base_url("app", "user", server.uri()).unwrap();
        assert!(matches!(
            notifier.send(&notification()).await.unwrap_err(),
            Error::Notification(_)
        ));
    }
}
