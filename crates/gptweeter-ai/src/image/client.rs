//! Front door for image generation: picks the backend family for a request,
//! normalizes results, and memoizes avatar images.

use std::sync::Arc;
use std::time::Duration;

use gptweeter_config::schema::ImagesConfig;
use gptweeter_config::{Credentials, GptweeterConfig, Service};
use tracing::{debug, info};

use crate::http::build_client;
use crate::AiError;

use super::cache::{CacheKey, ImageCache};
use super::dalle::DallEClient;
use super::data_uri::{encode_data_uri, fetch_as_data_uri, DEFAULT_MIME};
use super::poll::PollPolicy;
use super::replicate::ReplicateClient;
use super::types::{ImageOutput, ImageRequest};
use super::{AsyncImageBackend, SyncImageBackend};

pub struct ImageClient {
    config: ImagesConfig,
    sync_backend: Option<Arc<dyn SyncImageBackend>>,
    async_backend: Option<Arc<dyn AsyncImageBackend>>,
    poll: PollPolicy,
    cache: ImageCache,
    http: reqwest::Client,
}

impl ImageClient {
    /// A client with no backends; register them with the `with_*` methods.
    pub fn new(config: ImagesConfig) -> Result<Self, AiError> {
        let http = build_client(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self {
            poll: PollPolicy::from_config(&config),
            cache: ImageCache::new(config.cache_capacity),
            config,
            sync_backend: None,
            async_backend: None,
            http,
        })
    }

    /// Build every backend whose key is present.
    pub fn from_config(
        config: &GptweeterConfig,
        credentials: &Credentials,
    ) -> Result<Self, AiError> {
        let timeout = Duration::from_secs(config.images.request_timeout_secs);
        let mut client = Self::new(config.images.clone())?;

        if let Some(key) = credentials.get(Service::OpenAi) {
            client = client.with_sync_backend(Arc::new(DallEClient::new(
                key.expose(),
                &config.endpoints.openai,
                timeout,
            )?));
        }
        if let Some(key) = credentials.get(Service::Replicate) {
            client = client.with_async_backend(Arc::new(ReplicateClient::new(
                key.expose(),
                &config.endpoints.replicate,
                timeout,
            )?));
        }

        info!(
            sync_backend = client.sync_backend.is_some(),
            async_backend = client.async_backend.is_some(),
            default_backend = %client.config.default_backend,
            "image client ready"
        );
        Ok(client)
    }

    pub fn with_sync_backend(mut self, backend: Arc<dyn SyncImageBackend>) -> Self {
        self.sync_backend = Some(backend);
        self
    }

    pub fn with_async_backend(mut self, backend: Arc<dyn AsyncImageBackend>) -> Self {
        self.async_backend = Some(backend);
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// A request for `prompt` using the configured backend and size.
    pub fn request(&self, prompt: impl Into<String>) -> ImageRequest {
        ImageRequest::new(prompt)
            .with_backend(self.config.default_backend)
            .with_size(self.config.default_size)
    }

    /// Generate images. Job-based backends are polled to completion.
    pub async fn generate(&self, request: &ImageRequest) -> Result<Vec<ImageOutput>, AiError> {
        info!(
            backend = %request.backend,
            size = %request.size,
            n = request.count,
            "generating image"
        );

        let outputs = if request.backend.is_async() {
            let backend = self
                .async_backend
                .as_deref()
                .ok_or_else(|| missing_backend(Service::Replicate, request))?;
            let job = backend.submit(request).await?;
            debug!(job_id = %job.id, status = ?job.status, "image job submitted");
            self.poll.wait_for_job(backend, job).await?
        } else {
            let backend = self
                .sync_backend
                .as_deref()
                .ok_or_else(|| missing_backend(Service::OpenAi, request))?;
            backend.generate(request).await?
        };

        info!(backend = %request.backend, outputs = outputs.len(), "image generated");
        Ok(outputs)
    }

    /// Generate and return the first image as a `data:` URI.
    pub async fn generate_data_uri(&self, request: &ImageRequest) -> Result<String, AiError> {
        let first = self
            .generate(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AiError::MalformedProviderResponse(format!(
                    "{} returned no images",
                    request.backend
                ))
            })?;
        self.to_data_uri(&first).await
    }

    /// Encode one output; URLs are downloaded first.
    pub async fn to_data_uri(&self, output: &ImageOutput) -> Result<String, AiError> {
        match output {
            ImageOutput::Url(url) => fetch_as_data_uri(&self.http, url).await,
            ImageOutput::Bytes(bytes) => Ok(encode_data_uri(DEFAULT_MIME, bytes)),
        }
    }

    /// Avatar for `display_name`, generated from `prompt_template` with
    /// `{name}` substituted, and cached per (name, template).
    pub async fn cached_data_uri(
        &self,
        display_name: &str,
        prompt_template: &str,
    ) -> Result<String, AiError> {
        let key = CacheKey::new(display_name, prompt_template);
        if let Some(uri) = self.cache.get(&key) {
            debug!(display_name, "image cache hit");
            return Ok(uri);
        }

        let prompt = prompt_template.replace("{name}", display_name);
        let uri = self.generate_data_uri(&self.request(prompt)).await?;
        self.cache.insert(key, uri.clone());
        Ok(uri)
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }
}

fn missing_backend(service: Service, request: &ImageRequest) -> AiError {
    AiError::Configuration(format!(
        "image backend {} needs a {service} API key: set {} or write it to ~/{}",
        request.backend,
        service.env_var(),
        service.key_file()
    ))
}
