pub mod client;
pub mod error;
pub mod types;

pub use client::OpenAiGenerator;
pub use error::GenerationError;
pub use types::{ImageData, ImagesRequest, ImagesResponse, Moderation};

/// Seam for the external image generation service.
///
/// The returned URL is time-limited on the provider side, which is why the
/// handler re-hosts the artifact before replying.
#[allow(async_fn_in_trait)]
pub trait ImageGenerator {
    /// Generate one image for `prompt` and return its source URL.
    async fn generate(&self, prompt: &str, size: &str) -> Result<String, GenerationError>;

    /// Run the provider's content moderation over `input`.
    ///
    /// Only consulted when moderation is enabled in configuration; it is off
    /// by default because the moderation endpoint flags differently from the
    /// image endpoint's own filtering.
    async fn moderate(&self, input: &str) -> Result<Moderation, GenerationError>;
}
