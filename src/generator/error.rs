use thiserror::Error;

/// Errors raised while talking to the image generation provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider returned a structured error message. Displayed verbatim
    /// so the requester sees exactly what the provider said.
    #[error("{0}")]
    Provider(String),

    /// Any other non-success HTTP response.
    #[error("image API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The provider answered 200 but sent no usable image URL.
    #[error("image API returned no image")]
    EmptyResponse,

    /// Moderation flagged the prompt before generation.
    #[error("prompt flagged by moderation: {categories}")]
    Flagged { categories: String },

    /// Underlying network failure (DNS, connection refused, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
