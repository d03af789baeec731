//! Mock provider servers shared by the integration tests.

#![allow(dead_code)]

use gptweeter_config::{Credentials, GptweeterConfig, Service};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "test-api-key";

/// Config whose every endpoint points at `server`, with no retry delay.
pub fn config_for(server: &MockServer) -> GptweeterConfig {
    let mut config = GptweeterConfig::default();
    let base = format!("{}/v1", server.uri());
    config.endpoints.openai = base.clone();
    config.endpoints.groq = format!("{}/openai/v1", server.uri());
    config.endpoints.anthropic = base.clone();
    config.endpoints.replicate = base;
    config.chat.retry_delay_ms = 0;
    config.images.poll_interval_secs = 0;
    config
}

pub fn all_credentials() -> Credentials {
    Service::ALL
        .into_iter()
        .fold(Credentials::default(), |creds, service| {
            creds.with_key(service, TEST_KEY)
        })
}

pub fn chat_completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    }))
}

pub fn claude_message(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_test123",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 20}
    }))
}

pub fn prediction(id: &str, status: &str, output: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": id,
        "status": status,
        "output": output,
        "error": null
    }))
}

pub async fn mount_chat_success(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {TEST_KEY}").as_str()))
        .respond_with(chat_completion(content))
        .mount(server)
        .await;
}
