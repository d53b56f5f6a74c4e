//! Imgur-backed artifact store.
//!
//! Anonymous upload: only the application client ID is needed, and the
//! returned link is public immediately.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ArtifactStore;
use super::error::UploadError;

const API_BASE: &str = "https://api.imgur.com";

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    image: String,
    #[serde(rename = "type")]
    kind: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: bool,
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    link: Option<String>,
}

pub struct ImgurStore {
    client_id: String,
    client: Client,
    base_url: String,
}

impl ImgurStore {
    pub fn new(client_id: String) -> Self {
        Self::with_base_url(client_id, API_BASE.to_string())
    }

    /// Create a store pointing at a custom base URL (useful for testing).
    pub fn with_base_url(client_id: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client_id,
            client,
            base_url,
        }
    }
}

impl ArtifactStore for ImgurStore {
    async fn upload(&self, image: &[u8], naming_hint: &str) -> Result<String, UploadError> {
        debug!("uploading {} bytes to imgur", image.len());
        let req = UploadRequest {
            image: STANDARD.encode(image),
            kind: "base64",
            name: naming_hint,
        };
        let response = self
            .client
            .post(format!("{}/3/image", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(UploadError::Backend(format!(
                "imgur returned status {status}: {body}"
            )));
        }

        let body = response.json::<UploadResponse>().await?;
        match body.data.link {
            Some(link) if body.success => Ok(link),
            _ => Err(UploadError::Backend(
                "imgur response missing upload link".to_string(),
            )),
        }
    }
}
