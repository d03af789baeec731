//! Image generation against synchronous and job-based providers.
//!
//! Synchronous backends (DALL-E) answer with the images in one response.
//! Asynchronous backends (Replicate-style predictions) hand back a job that
//! is polled under a [`PollPolicy`] until it leaves the pending state.

mod cache;
mod client;
mod dalle;
pub mod data_uri;
mod poll;
mod replicate;
mod types;

use async_trait::async_trait;

use crate::AiError;

pub use cache::{CacheKey, ImageCache, DEFAULT_CAPACITY};
pub use client::ImageClient;
pub use dalle::DallEClient;
pub use poll::PollPolicy;
pub use replicate::ReplicateClient;
pub use types::{ImageJob, ImageOutput, ImageRequest, JobStatus, ResponseFormat};

/// A provider that returns finished images from a single call.
#[async_trait]
pub trait SyncImageBackend: Send + Sync {
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<ImageOutput>, AiError>;
}

/// A provider that runs generation as a job.
#[async_trait]
pub trait AsyncImageBackend: Send + Sync {
    /// Start a job. The returned job may already be terminal.
    async fn submit(&self, request: &ImageRequest) -> Result<ImageJob, AiError>;

    /// Fetch the current state of a submitted job.
    async fn poll(&self, job_id: &str) -> Result<ImageJob, AiError>;
}
