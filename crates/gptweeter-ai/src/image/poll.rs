//! Bounded polling of asynchronous image jobs.

use std::time::Duration;

use gptweeter_config::schema::ImagesConfig;
use tracing::debug;

use crate::AiError;

use super::types::{ImageJob, ImageOutput, JobStatus};
use super::AsyncImageBackend;

/// Interval between status polls and how many polls a job gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: 10,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls,
        }
    }

    pub fn from_config(config: &ImagesConfig) -> Self {
        Self::new(
            Duration::from_secs(config.poll_interval_secs),
            config.max_polls,
        )
    }

    /// Drive `submitted` to a terminal state.
    ///
    /// A job that is already terminal is resolved without polling. A job
    /// still pending after `max_polls` polls is abandoned with
    /// [`AiError::ImageGenerationTimeout`].
    pub async fn wait_for_job(
        &self,
        backend: &dyn AsyncImageBackend,
        submitted: ImageJob,
    ) -> Result<Vec<ImageOutput>, AiError> {
        let job_id = submitted.id.clone();
        let mut job = submitted;
        let mut polls = 0;

        loop {
            match job.status {
                JobStatus::Succeeded => {
                    debug!(job_id = %job_id, polls, outputs = job.output.len(), "image job succeeded");
                    return Ok(job.output);
                }
                JobStatus::Failed => {
                    return Err(AiError::ImageGenerationFailed {
                        job_id,
                        diagnostic: job
                            .error
                            .unwrap_or_else(|| "provider gave no reason".to_string()),
                    });
                }
                JobStatus::Pending if polls >= self.max_polls => {
                    return Err(AiError::ImageGenerationTimeout { job_id, polls });
                }
                JobStatus::Pending => {
                    tokio::time::sleep(self.interval).await;
                    job = backend.poll(&job_id).await?;
                    polls += 1;
                    debug!(job_id = %job_id, poll = polls, status = ?job.status, "polled image job");
                }
            }
        }
    }
}
