//! OpenAI images API (DALL-E), synchronous.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

use crate::http::{build_client, check_status, read_json, send_error};
use crate::AiError;

use super::types::{ImageOutput, ImageRequest};
use super::SyncImageBackend;

pub struct DallEClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl fmt::Debug for DallEClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DallEClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DallEClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: build_client(timeout)?,
        })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/images/generations",
            self.base_url.trim_end_matches('/')
        )
    }

    fn build_request_body(request: &ImageRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.backend.as_str(),
            "prompt": request.prompt,
            "n": request.count,
            "size": request.size.to_string(),
            "response_format": request.format.as_str(),
        })
    }

    /// Each `data[]` entry carries either a `url` or a `b64_json` payload.
    fn parse_response(json: &serde_json::Value) -> Result<Vec<ImageOutput>, AiError> {
        let data = json["data"].as_array().ok_or_else(|| {
            AiError::MalformedProviderResponse("image response has no data array".into())
        })?;

        data.iter()
            .map(|item| {
                if let Some(url) = item["url"].as_str() {
                    Ok(ImageOutput::Url(url.to_string()))
                } else if let Some(b64) = item["b64_json"].as_str() {
                    BASE64.decode(b64).map(ImageOutput::Bytes).map_err(|e| {
                        AiError::MalformedProviderResponse(format!("invalid b64_json image: {e}"))
                    })
                } else {
                    Err(AiError::MalformedProviderResponse(
                        "image entry has neither url nor b64_json".into(),
                    ))
                }
            })
            .collect()
    }
}

#[async_trait]
impl SyncImageBackend for DallEClient {
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<ImageOutput>, AiError> {
        let body = Self::build_request_body(request);
        debug!(model = request.backend.as_str(), n = request.count, "image generation request");

        let response = self
            .http
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;

        let json = read_json(check_status(response).await?).await?;
        Self::parse_response(&json)
    }
}
