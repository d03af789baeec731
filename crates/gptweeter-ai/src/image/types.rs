//! Image request and result types.

use gptweeter_config::{ImageBackendKind, ImageSize};
use serde::{Deserialize, Serialize};

/// How a synchronous provider should return images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Url,
    B64Json,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Url => "url",
            ResponseFormat::B64Json => "b64_json",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub count: u32,
    pub format: ResponseFormat,
    pub size: ImageSize,
    pub backend: ImageBackendKind,
}

impl ImageRequest {
    /// One 1024x1024 image from the default backend, returned as a URL.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count: 1,
            format: ResponseFormat::default(),
            size: ImageSize::default(),
            backend: ImageBackendKind::default(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_backend(mut self, backend: ImageBackendKind) -> Self {
        self.backend = backend;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutput {
    Url(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Map a provider status string. Unrecognized values are treated as
    /// pending; the poll budget bounds how long they are waited on.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "succeeded" => JobStatus::Succeeded,
            "failed" | "canceled" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// Snapshot of an asynchronous generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub id: String,
    pub status: JobStatus,
    pub output: Vec<ImageOutput>,
    pub error: Option<String>,
}

impl ImageJob {
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            output: Vec::new(),
            error: None,
        }
    }

    pub fn succeeded(id: impl Into<String>, output: Vec<ImageOutput>) -> Self {
        Self {
            status: JobStatus::Succeeded,
            output,
            ..Self::pending(id)
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            error: Some(error.into()),
            ..Self::pending(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_statuses_map_to_three_states() {
        assert_eq!(JobStatus::from_provider("starting"), JobStatus::Pending);
        assert_eq!(JobStatus::from_provider("processing"), JobStatus::Pending);
        assert_eq!(JobStatus::from_provider("succeeded"), JobStatus::Succeeded);
        assert_eq!(JobStatus::from_provider("failed"), JobStatus::Failed);
        assert_eq!(JobStatus::from_provider("canceled"), JobStatus::Failed);
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn response_format_wire_names() {
        assert_eq!(
            serde_json::to_string(&ResponseFormat::B64Json).unwrap(),
            r#""b64_json""#
        );
        assert_eq!(ResponseFormat::Url.as_str(), "url");
    }

    #[test]
    fn request_builder() {
        let request = ImageRequest::new("a duck")
            .with_count(2)
            .with_size(ImageSize::new(512, 512))
            .with_backend(ImageBackendKind::FluxSchnell);
        assert_eq!(request.count, 2);
        assert_eq!(request.size.to_string(), "512x512");
        assert_eq!(request.format, ResponseFormat::Url);
        assert!(request.backend.is_async());
    }
}
