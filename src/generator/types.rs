//! Wire types for the OpenAI Images and Moderation endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesRequest {
    pub prompt: String,
    pub n: u8,
    pub size: String,
}

impl ImagesRequest {
    /// A single-image request, which is all the bot ever asks for.
    pub fn single(prompt: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            n: 1,
            size: size.into(),
        }
    }
}

/// Response body for `POST /v1/images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub data: Vec<ImageData>,
}

/// One generated image. The URL is time-limited on the provider side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
}

/// Request body for `POST /v1/moderations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub input: String,
}

/// Response body for `POST /v1/moderations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub results: Vec<Moderation>,
}

/// One moderation verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moderation {
    pub flagged: bool,
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
}

impl Moderation {
    /// The names of the categories that flagged, for the failure message.
    pub fn flagged_categories(&self) -> String {
        let names: Vec<&str> = self
            .categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
            .collect();
        if names.is_empty() {
            "unspecified".to_string()
        } else {
            names.join(", ")
        }
    }
}
