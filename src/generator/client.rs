use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::ImageGenerator;
use super::error::GenerationError;
use super::types::{ImagesRequest, ImagesResponse, Moderation, ModerationRequest, ModerationResponse};

const API_BASE: &str = "https://api.openai.com";

/// Error envelope the OpenAI API wraps failures in.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the OpenAI Images and Moderation endpoints.
pub struct OpenAiGenerator {
    api_key: String,
    organization: Option<String>,
    client: Client,
    base_url: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, organization: Option<String>) -> Self {
        Self::with_base_url(api_key, organization, API_BASE.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, organization: Option<String>, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            organization,
            client,
            base_url,
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key);
        if let Some(org) = &self.organization {
            builder = builder.header("OpenAI-Organization", org);
        }
        builder
    }

    /// Convert a non-success response into an error, preferring the
    /// provider's own message when the body carries one.
    async fn error_from(response: reqwest::Response) -> GenerationError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => GenerationError::Provider(envelope.error.message),
            Err(_) => GenerationError::ApiError {
                status,
                message: body,
            },
        }
    }
}

impl ImageGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, size: &str) -> Result<String, GenerationError> {
        let req = ImagesRequest::single(prompt, size);
        let response = self
            .post("/v1/images/generations")
            .json(&req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.json::<ImagesResponse>().await?;
        body.data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or(GenerationError::EmptyResponse)
    }

    async fn moderate(&self, input: &str) -> Result<Moderation, GenerationError> {
        let req = ModerationRequest {
            input: input.to_string(),
        };
        let response = self.post("/v1/moderations").json(&req).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.json::<ModerationResponse>().await?;
        body.results
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)
    }
}
