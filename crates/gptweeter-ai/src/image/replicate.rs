//! Replicate-style predictions API, asynchronous.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use gptweeter_config::ImageBackendKind;
use tracing::debug;

use crate::http::{build_client, check_status, read_json, send_error};
use crate::AiError;

use super::types::{ImageJob, ImageOutput, ImageRequest, JobStatus};
use super::AsyncImageBackend;

pub struct ReplicateClient {
    api_token: String,
    base_url: String,
    http: reqwest::Client,
}

impl fmt::Debug for ReplicateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicateClient")
            .field("api_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Hosted model path for a job-based backend.
fn model_path(backend: ImageBackendKind) -> Result<&'static str, AiError> {
    match backend {
        ImageBackendKind::FluxSchnell => Ok("black-forest-labs/flux-schnell"),
        other => Err(AiError::Configuration(format!(
            "{other} is not served by the predictions API"
        ))),
    }
}

impl ReplicateClient {
    pub fn new(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        Ok(Self {
            api_token: api_token.into(),
            base_url: base_url.into(),
            http: build_client(timeout)?,
        })
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn build_request_body(request: &ImageRequest) -> serde_json::Value {
        serde_json::json!({
            "input": {
                "prompt": request.prompt,
                "width": request.size.width,
                "height": request.size.height,
                "num_outputs": request.count,
            }
        })
    }

    /// Read `{id, status, output, error}`. `output` may be null, a single
    /// URL, or a list of URLs.
    fn parse_job(json: &serde_json::Value) -> Result<ImageJob, AiError> {
        let id = json["id"].as_str().ok_or_else(|| {
            AiError::MalformedProviderResponse("prediction has no id".into())
        })?;
        let status = json["status"].as_str().ok_or_else(|| {
            AiError::MalformedProviderResponse(format!("prediction {id} has no status"))
        })?;

        let output = match &json["output"] {
            serde_json::Value::String(url) => vec![ImageOutput::Url(url.clone())],
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|url| ImageOutput::Url(url.to_string()))
                .collect(),
            _ => Vec::new(),
        };

        let error = match &json["error"] {
            serde_json::Value::Null => None,
            serde_json::Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        };

        Ok(ImageJob {
            id: id.to_string(),
            status: JobStatus::from_provider(status),
            output,
            error,
        })
    }
}

#[async_trait]
impl AsyncImageBackend for ReplicateClient {
    async fn submit(&self, request: &ImageRequest) -> Result<ImageJob, AiError> {
        let url = format!(
            "{}/models/{}/predictions",
            self.base(),
            model_path(request.backend)?
        );
        debug!(url = %url, n = request.count, "submitting prediction");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&Self::build_request_body(request))
            .send()
            .await
            .map_err(send_error)?;

        let json = read_json(check_status(response).await?).await?;
        Self::parse_job(&json)
    }

    async fn poll(&self, job_id: &str) -> Result<ImageJob, AiError> {
        let response = self
            .http
            .get(format!("{}/predictions/{job_id}", self.base()))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(send_error)?;

        let json = read_json(check_status(response).await?).await?;
        Self::parse_job(&json)
    }
}
