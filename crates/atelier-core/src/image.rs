//! Image-generation provider contract.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of an image provider. Never escapes the synthesizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image provider unavailable: {0}")]
    Unavailable(String),

    #[error("Image request failed: {0}")]
    Request(String),

    #[error("Image provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Image provider returned no image")]
    EmptyResponse,
}

/// Renders an image for a prompt and returns a resolvable URI.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError>;

    fn provider_name(&self) -> &str;
}
