//! HostedImageProvider - primary image provider backed by an
//! OpenAI-compatible `/images/generations` endpoint.

use async_trait::async_trait;
use atelier_core::config::ImageSettings;
use atelier_core::{ApiCredential, AtelierError, ImageError, ImageProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone)]
pub struct HostedImageProvider {
    client: Client,
    credential: ApiCredential,
    settings: ImageSettings,
}

impl HostedImageProvider {
    pub fn new(settings: ImageSettings, credential: ApiCredential) -> Result<Self, AtelierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| AtelierError::internal(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            credential,
            settings,
        })
    }
}

#[async_trait]
impl ImageProvider for HostedImageProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let body = ImageRequest {
            model: &self.settings.model,
            prompt,
            size: &self.settings.size,
            n: 1,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(self.credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|err| ImageError::Request(err.to_string()))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| ImageError::Request(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body_text)
                .map(|wrapper| wrapper.error.message)
                .unwrap_or(body_text);
            return Err(ImageError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ImageResponse = serde_json::from_str(&body_text)
            .map_err(|err| ImageError::Request(format!("Failed to parse image response: {err}")))?;

        let image = parsed.data.into_iter().next().ok_or(ImageError::EmptyResponse)?;
        match (image.url, image.b64_json) {
            (Some(url), _) if !url.is_empty() => Ok(url),
            (_, Some(b64)) if !b64.is_empty() => Ok(format!("data:image/png;base64,{b64}")),
            _ => Err(ImageError::EmptyResponse),
        }
    }

    fn provider_name(&self) -> &str {
        "hosted-image"
    }
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
