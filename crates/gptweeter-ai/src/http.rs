//! Shared reqwest plumbing: client construction and status mapping.

use std::time::Duration;

use crate::AiError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()
        .map_err(|e| AiError::Configuration(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn send_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

/// Turn non-2xx responses into errors, keeping the start of the body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text = text.chars().take(200).collect::<String>();
        return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
    }
    Ok(response)
}

pub(crate) async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, AiError> {
    response
        .json()
        .await
        .map_err(|e| AiError::ParseError(e.to_string()))
}
