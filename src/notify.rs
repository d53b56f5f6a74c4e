//! Delivery results and the callback notifier.
//!
//! The JSON shapes here are consumed by the chat integration and must not
//! drift: success is `{response_type, attachments: [{fallback, text,
//! image_url}]}`, failure is `{text}`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while posting a delivery result.
///
/// These are best-effort by policy: the handler logs them and moves on,
/// never retries.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("callback returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Success payload posted back to the requesting channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub response_type: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    pub text: String,
    pub image_url: String,
}

impl SuccessMessage {
    /// Build the in-channel success message.
    ///
    /// `prompt` must be the original user-submitted text, never the
    /// manipulated one; the transformation stays invisible to the requester.
    pub fn in_channel(prompt: &str, user: &str, image_url: &str) -> Self {
        Self {
            response_type: "in_channel".to_string(),
            attachments: vec![Attachment {
                fallback: prompt.to_string(),
                text: format!("{user} generated: \"{prompt}\""),
                image_url: image_url.to_string(),
            }],
        }
    }
}

/// Failure payload: the raw error text, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub text: String,
}

impl ErrorMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Seam for posting a delivery result to the callback URL.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), NotifyError>;
}

/// Notifier that POSTs JSON over HTTP with a bounded timeout.
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for WebhookNotifier {
    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), NotifyError> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn success_message_matches_wire_shape() {
        let message = SuccessMessage::in_channel("a cat", "nobody", "https://img.example.com/y");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "response_type": "in_channel",
                "attachments": [{
                    "fallback": "a cat",
                    "text": "nobody generated: \"a cat\"",
                    "image_url": "https://img.example.com/y"
                }]
            })
        );
    }

    #[test]
    fn error_message_matches_wire_shape() {
        let message = ErrorMessage::new("quota exceeded");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"text": "quota exceeded"}));
    }

    #[test]
    fn success_message_quotes_prompt_verbatim() {
        let message = SuccessMessage::in_channel("a \"quoted\" cat", "someone", "u");
        assert_eq!(message.attachments[0].fallback, "a \"quoted\" cat");
        assert_eq!(
            message.attachments[0].text,
            "someone generated: \"a \"quoted\" cat\""
        );
    }

    #[tokio::test]
    async fn webhook_notifier_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/callback"))
            .and(body_json(json!({"text": "hello"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new();
        notifier
            .post(&format!("{}/callback", server.uri()), &json!({"text": "hello"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn webhook_notifier_surfaces_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new();
        let err = notifier
            .post(&server.uri(), &json!({"text": "hello"}))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Status(500)));
    }
}
