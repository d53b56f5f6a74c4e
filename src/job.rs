//! The inbound job message.
//!
//! The dispatch stage (a separate front-end that answers the slash command
//! within the chat platform's response deadline) republishes the request as
//! a small JSON message. This module owns that shape.

use serde::{Deserialize, Serialize};

/// One prompt-to-image request, decoded from the dispatch message.
///
/// Immutable once received; scoped to a single handler invocation and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// The user-supplied prompt text, exactly as typed.
    pub prompt: String,
    /// The requesting user's name.
    pub user: String,
    /// Where the delivery result must be posted.
    pub response_url: String,
}

impl Job {
    pub fn new(
        prompt: impl Into<String>,
        user: impl Into<String>,
        response_url: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            user: user.into(),
            response_url: response_url.into(),
        }
    }

    /// Decode a job from the raw dispatch message payload.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn callback_url(&self) -> &str {
        &self.response_url
    }
}
